//! Members of the `v4l2_format.fmt` union, selected by buffer type.

use super::layout::{Access, FieldKind, FieldSpec, StructLayout};
use crate::tables::{COLORSPACES, FIELDS, PIX_FMT_FLAGS, SLICED_SERVICES, VBI_FLAGS};
use crate::PointerWidth;

/// Size of the `fmt` union in bytes (`raw_data[200]`).
pub const FORMAT_UNION_BYTES: usize = 200;

/// Union member of `struct v4l2_format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FormatVariant {
    /// `struct v4l2_pix_format` (single-planar video).
    Pix,
    /// `struct v4l2_pix_format_mplane` (multi-planar video).
    PixMplane,
    /// `struct v4l2_window` (overlays).
    Window,
    /// `struct v4l2_vbi_format` (raw VBI).
    Vbi,
    /// `struct v4l2_sliced_vbi_format`.
    SlicedVbi,
    /// `struct v4l2_sdr_format`.
    Sdr,
    /// `struct v4l2_meta_format`.
    Meta,
}

impl FormatVariant {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Pix,
        Self::PixMplane,
        Self::Window,
        Self::Vbi,
        Self::SlicedVbi,
        Self::Sdr,
        Self::Meta,
    ];

    /// Selects the union member for a `V4L2_BUF_TYPE_*` value.
    #[must_use]
    pub const fn from_buf_type(buf_type: u32) -> Option<Self> {
        match buf_type {
            1 | 2 => Some(Self::Pix),
            9 | 10 => Some(Self::PixMplane),
            3 | 8 => Some(Self::Window),
            4 | 5 => Some(Self::Vbi),
            6 | 7 => Some(Self::SlicedVbi),
            11 | 12 => Some(Self::Sdr),
            13 | 14 => Some(Self::Meta),
            _ => None,
        }
    }

    /// Field name printed for this member, e.g. `fmt.pix`.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Pix => "fmt.pix",
            Self::PixMplane => "fmt.pix_mp",
            Self::Window => "fmt.win",
            Self::Vbi => "fmt.vbi",
            Self::SlicedVbi => "fmt.sliced",
            Self::Sdr => "fmt.sdr",
            Self::Meta => "fmt.meta",
        }
    }

    /// Builds the member's layout for the given pointer width.
    #[must_use]
    pub fn layout(self, pointer_width: PointerWidth) -> StructLayout {
        match self {
            Self::Pix => pix_layout(),
            Self::PixMplane => pix_mplane_layout(),
            Self::Window => window_layout(pointer_width),
            Self::Vbi => vbi_layout(),
            Self::SlicedVbi => sliced_vbi_layout(),
            Self::Sdr => StructLayout::structure(
                "v4l2_sdr_format",
                8,
                vec![
                    field("pixelformat", 0, 4, FieldKind::Fourcc),
                    field("buffersize", 4, 4, FieldKind::Unsigned),
                ],
            ),
            Self::Meta => StructLayout::structure(
                "v4l2_meta_format",
                8,
                vec![
                    field("dataformat", 0, 4, FieldKind::Fourcc),
                    field("buffersize", 4, 4, FieldKind::Unsigned),
                ],
            ),
        }
    }
}

const fn field(name: &'static str, offset: usize, size: usize, kind: FieldKind) -> FieldSpec {
    FieldSpec::new(name, offset, size, kind, Access::In)
}

fn pix_layout() -> StructLayout {
    StructLayout::structure(
        "v4l2_pix_format",
        48,
        vec![
            field("width", 0, 4, FieldKind::Unsigned),
            field("height", 4, 4, FieldKind::Unsigned),
            field("pixelformat", 8, 4, FieldKind::Fourcc),
            field("field", 12, 4, FieldKind::Enum(&FIELDS)),
            field("bytesperline", 16, 4, FieldKind::Unsigned),
            field("sizeimage", 20, 4, FieldKind::Unsigned),
            field("colorspace", 24, 4, FieldKind::Enum(&COLORSPACES)),
            field("flags", 32, 4, FieldKind::Flags(&PIX_FMT_FLAGS)),
        ],
    )
}

fn pix_mplane_layout() -> StructLayout {
    StructLayout::structure(
        "v4l2_pix_format_mplane",
        192,
        vec![
            field("width", 0, 4, FieldKind::Unsigned),
            field("height", 4, 4, FieldKind::Unsigned),
            field("pixelformat", 8, 4, FieldKind::Fourcc),
            field("field", 12, 4, FieldKind::Enum(&FIELDS)),
            field("colorspace", 16, 4, FieldKind::Enum(&COLORSPACES)),
            field(
                "plane_fmt",
                20,
                160,
                FieldKind::PlaneFormats {
                    count_offset: 180,
                    stride: 20,
                    max: 8,
                },
            ),
            field("num_planes", 180, 1, FieldKind::Unsigned),
        ],
    )
}

fn window_layout(pointer_width: PointerWidth) -> StructLayout {
    let ptr = pointer_width.bytes();
    let clips = 24;
    let clipcount = clips + ptr;
    let bitmap = (clipcount + 4).next_multiple_of(ptr);
    let global_alpha = bitmap + ptr;
    let size = (global_alpha + 1).next_multiple_of(ptr);

    StructLayout::structure(
        "v4l2_window",
        size,
        vec![
            field("w", 0, 16, FieldKind::Rect),
            field("field", 16, 4, FieldKind::Enum(&FIELDS)),
            field("chromakey", 20, 4, FieldKind::Hex),
            field("clipcount", clipcount, 4, FieldKind::Unsigned),
            field("global_alpha", global_alpha, 1, FieldKind::Hex),
        ],
    )
}

fn vbi_layout() -> StructLayout {
    StructLayout::structure(
        "v4l2_vbi_format",
        44,
        vec![
            field("sampling_rate", 0, 4, FieldKind::Unsigned),
            field("offset", 4, 4, FieldKind::Unsigned),
            field("samples_per_line", 8, 4, FieldKind::Unsigned),
            field("sample_format", 12, 4, FieldKind::Fourcc),
            field("start[0]", 16, 4, FieldKind::Signed),
            field("start[1]", 20, 4, FieldKind::Signed),
            field("count[0]", 24, 4, FieldKind::Unsigned),
            field("count[1]", 28, 4, FieldKind::Unsigned),
            field("flags", 32, 4, FieldKind::Flags(&VBI_FLAGS)),
        ],
    )
}

fn sliced_vbi_layout() -> StructLayout {
    StructLayout::structure(
        "v4l2_sliced_vbi_format",
        112,
        vec![
            field("service_set", 0, 2, FieldKind::Flags(&SLICED_SERVICES)),
            field("io_size", 100, 4, FieldKind::Unsigned),
        ],
    )
}
