//! Declarative byte layouts of V4L2 argument structures.

use crate::xlat::XlatTable;

/// When a field's value is meaningful relative to the system call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Access {
    /// Supplied by the caller; printed from the entry snapshot.
    In,
    /// Filled in by the driver; printed from the exit snapshot and only
    /// when the call returned successfully.
    Out,
    /// Supplied by the caller and updated by the driver; printed as
    /// `entry => exit` after a successful return.
    InOut,
}

/// How a field's bytes are interpreted and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Unsigned decimal integer of the field's size (1, 2, 4 or 8 bytes).
    Unsigned,
    /// Signed decimal integer of the field's size.
    Signed,
    /// Unsigned integer printed in hex.
    Hex,
    /// Enumeration member of the table.
    Enum(&'static XlatTable),
    /// Flag set drawn from the table.
    Flags(&'static XlatTable),
    /// Fixed-size NUL-terminated character array.
    CString,
    /// Four-character codec tag.
    Fourcc,
    /// `KERNEL_VERSION()` packed version number.
    KernelVersion,
    /// `struct v4l2_rect`.
    Rect,
    /// Array of `struct v4l2_plane_pix_format` whose element count is a
    /// `u8` stored at `count_offset` (relative to the enclosing layout).
    PlaneFormats {
        /// Offset of the `num_planes` byte.
        count_offset: usize,
        /// Size of one array element.
        stride: usize,
        /// Capacity of the array.
        max: usize,
    },
    /// `v4l2_format.fmt` union; the member is selected by the `u32` buffer
    /// type stored at `type_offset`.
    FormatUnion {
        /// Offset of the discriminating `type` field.
        type_offset: usize,
    },
}

/// One field of a structure layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Name printed before `=`; empty for scalar arguments.
    pub name: &'static str,
    /// Byte offset from the start of the structure.
    pub offset: usize,
    /// Byte length.
    pub size: usize,
    /// Interpretation of the bytes.
    pub kind: FieldKind,
    /// Data-flow direction.
    pub access: Access,
}

impl FieldSpec {
    /// Creates a field.
    #[must_use]
    pub const fn new(
        name: &'static str,
        offset: usize,
        size: usize,
        kind: FieldKind,
        access: Access,
    ) -> Self {
        Self {
            name,
            offset,
            size,
            kind,
            access,
        }
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Returns `true` when the field is printed for a call whose exit
    /// snapshot is (or is not) available.
    #[must_use]
    pub const fn is_visible(&self, exiting: bool) -> bool {
        exiting || !matches!(self.access, Access::Out)
    }
}

/// Bracketing of the rendered argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Shape {
    /// `{name=value, ...}`.
    Struct,
    /// `[value]` for pointers to a single integer.
    Scalar,
}

/// Ordered field list of one structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructLayout {
    /// C structure name.
    pub name: &'static str,
    /// Declared structure size in bytes; the length requested from memory.
    pub size: usize,
    /// Bracketing of the rendered argument.
    pub shape: Shape,
    /// Fields in declaration order.
    pub fields: Vec<FieldSpec>,
}

impl StructLayout {
    /// Creates a `{...}` layout.
    #[must_use]
    pub const fn structure(name: &'static str, size: usize, fields: Vec<FieldSpec>) -> Self {
        Self {
            name,
            size,
            shape: Shape::Struct,
            fields,
        }
    }

    /// Creates a `[...]` layout over a single `int`.
    #[must_use]
    pub fn scalar(name: &'static str, kind: FieldKind, access: Access) -> Self {
        Self {
            name,
            size: 4,
            shape: Shape::Scalar,
            fields: vec![FieldSpec::new("", 0, 4, kind, access)],
        }
    }

    /// Returns `true` when at least one field would be printed.
    #[must_use]
    pub fn has_visible_fields(&self, exiting: bool) -> bool {
        self.fields.iter().any(|field| field.is_visible(exiting))
    }

    /// Returns `true` when every field lies inside the declared size and no
    /// two fields overlap. Print order may differ from offset order.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let mut spans: Vec<_> = self
            .fields
            .iter()
            .map(|field| (field.offset, field.end()))
            .collect();
        spans.sort_unstable();

        let mut cursor = 0;
        for (start, end) in spans {
            if start < cursor || end > self.size {
                return false;
            }
            cursor = end;
        }
        true
    }
}
