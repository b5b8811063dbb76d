//! Structure decoders: declarative layouts and the walker that renders them.

pub mod engine;
pub mod layout;
pub mod structure;
pub mod variant;

pub use engine::StructDecoder;
pub use layout::{Access, FieldKind, FieldSpec, Shape, StructLayout};
pub use structure::{DecodedField, DecodedStructure, Marker};
pub use variant::{FormatVariant, FORMAT_UNION_BYTES};
