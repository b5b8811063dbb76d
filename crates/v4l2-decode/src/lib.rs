//! Decoder for Video4Linux2 `ioctl` arguments observed by a syscall tracer.
//!
//! Given a command code, the argument pointer and access to the traced
//! process's memory, the [`Dispatcher`] produces the annotated argument text
//! a tracer prints, and [`TraceLine`] assembles the full `ioctl(...)` line.

/// Error types for memory transports and symbolic lookups.
pub mod error;
pub use error::{LookupError, ReadFault};

/// Target platform description and decoder configuration.
pub mod config;
pub use config::{ByteOrder, DecoderConfig, Platform, PointerWidth, ShortReadPolicy, XlatStyle};

/// Value-to-name symbol tables with enum and bitmask rendering.
pub mod xlat;
pub use xlat::{hex, resolve_bitmask, resolve_enum, Decomposition, XlatEntry, XlatTable};

/// Static V4L2 symbol tables.
pub mod tables;
pub use tables::{symbol_value, ALL_TABLES};

/// Argument memory views, readers and the snapshot address space.
pub mod memory;
pub use memory::{
    Availability, MappedRegion, MemoryReader, MemoryTransport, MemoryView, SnapshotMemory,
    TracedMemory,
};

/// String quoting collaborator.
pub mod quote;
pub use quote::{quote, quote_cstring};

/// Pointer, fourcc and kernel version formatters.
pub mod format;
pub use format::{format_fourcc, format_kernel_version, format_pointer};

/// Structure layouts and the layout walker.
pub mod decode;
pub use decode::{
    Access, DecodedField, DecodedStructure, FieldKind, FieldSpec, FormatVariant, Marker, Shape,
    StructDecoder, StructLayout,
};

/// `_IOC` encoding and command descriptors.
pub mod command;
pub use command::{ioc, ioc_name, ArgumentKind, Command, Direction};

/// Command table and argument layouts for one platform.
pub mod catalog;
pub use catalog::Catalog;

/// Deterministic decode trace hooks.
pub mod trace;
pub use trace::{DecodeEvent, DecodeSink, NullSink, RecordingSink};

/// Command dispatcher.
pub mod dispatch;
pub use dispatch::{Dispatcher, PointerReason, RenderedArgument};

/// Trace line assembly.
pub mod render;
pub use render::{CallOutcome, Errno, TraceLine};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
