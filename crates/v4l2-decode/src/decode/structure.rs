//! Decoded argument representation handed to the output assembler.

use super::layout::Shape;

/// One rendered field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodedField {
    /// Field name; empty for scalar arguments.
    pub name: &'static str,
    /// Rendered value.
    pub value: String,
    /// Set when the value came from a partially read view.
    pub truncated: bool,
}

/// How decoding of a structure ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Marker {
    /// Every printable field was decoded.
    Complete,
    /// Decoding stopped at a field extending past the bytes read.
    Truncated,
    /// Nothing could be read; only the pointer is printed.
    Unreadable,
}

/// Ordered decoded fields plus a terminal marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodedStructure {
    /// C structure name of the decoded layout.
    pub layout: &'static str,
    /// Bracketing used when rendering.
    pub shape: Shape,
    /// Fields in decoding order.
    pub fields: Vec<DecodedField>,
    /// Terminal marker.
    pub marker: Marker,
}

impl DecodedStructure {
    /// Structure with no fields whose memory could not be read.
    #[must_use]
    pub const fn unreadable(layout: &'static str, shape: Shape) -> Self {
        Self {
            layout,
            shape,
            fields: Vec::new(),
            marker: Marker::Unreadable,
        }
    }

    /// Renders the bracketed body, or `None` for unreadable structures.
    #[must_use]
    pub fn render_body(&self) -> Option<String> {
        if self.marker == Marker::Unreadable {
            return None;
        }

        let body = match self.shape {
            Shape::Scalar => self
                .fields
                .iter()
                .map(|field| field.value.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Shape::Struct => self
                .fields
                .iter()
                .map(|field| format!("{}={}", field.name, field.value))
                .collect::<Vec<_>>()
                .join(", "),
        };

        Some(match self.shape {
            Shape::Scalar => format!("[{body}]"),
            Shape::Struct => format!("{{{body}}}"),
        })
    }
}
