//! V4L2 symbol tables, with values from the Linux `videodev2.h` UAPI header.

use crate::xlat::{has_unique_values, XlatEntry, XlatTable};

/// Builds a fourcc code from its four characters, first character in the
/// least significant byte.
#[must_use]
pub const fn fourcc(a: u8, b: u8, c: u8, d: u8) -> u32 {
    (a as u32) | ((b as u32) << 8) | ((c as u32) << 16) | ((d as u32) << 24)
}

const CAPABILITY_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(0x0000_0001, "V4L2_CAP_VIDEO_CAPTURE"),
    XlatEntry::new(0x0000_0002, "V4L2_CAP_VIDEO_OUTPUT"),
    XlatEntry::new(0x0000_0004, "V4L2_CAP_VIDEO_OVERLAY"),
    XlatEntry::new(0x0000_0010, "V4L2_CAP_VBI_CAPTURE"),
    XlatEntry::new(0x0000_0020, "V4L2_CAP_VBI_OUTPUT"),
    XlatEntry::new(0x0000_0040, "V4L2_CAP_SLICED_VBI_CAPTURE"),
    XlatEntry::new(0x0000_0080, "V4L2_CAP_SLICED_VBI_OUTPUT"),
    XlatEntry::new(0x0000_0100, "V4L2_CAP_RDS_CAPTURE"),
    XlatEntry::new(0x0000_0200, "V4L2_CAP_VIDEO_OUTPUT_OVERLAY"),
    XlatEntry::new(0x0000_0400, "V4L2_CAP_HW_FREQ_SEEK"),
    XlatEntry::new(0x0000_0800, "V4L2_CAP_RDS_OUTPUT"),
    XlatEntry::new(0x0000_1000, "V4L2_CAP_VIDEO_CAPTURE_MPLANE"),
    XlatEntry::new(0x0000_2000, "V4L2_CAP_VIDEO_OUTPUT_MPLANE"),
    XlatEntry::new(0x0000_4000, "V4L2_CAP_VIDEO_M2M_MPLANE"),
    XlatEntry::new(0x0000_8000, "V4L2_CAP_VIDEO_M2M"),
    XlatEntry::new(0x0001_0000, "V4L2_CAP_TUNER"),
    XlatEntry::new(0x0002_0000, "V4L2_CAP_AUDIO"),
    XlatEntry::new(0x0004_0000, "V4L2_CAP_RADIO"),
    XlatEntry::new(0x0008_0000, "V4L2_CAP_MODULATOR"),
    XlatEntry::new(0x0010_0000, "V4L2_CAP_SDR_CAPTURE"),
    XlatEntry::new(0x0020_0000, "V4L2_CAP_EXT_PIX_FORMAT"),
    XlatEntry::new(0x0040_0000, "V4L2_CAP_SDR_OUTPUT"),
    XlatEntry::new(0x0080_0000, "V4L2_CAP_META_CAPTURE"),
    XlatEntry::new(0x0100_0000, "V4L2_CAP_READWRITE"),
    XlatEntry::new(0x0200_0000, "V4L2_CAP_ASYNCIO"),
    XlatEntry::new(0x0400_0000, "V4L2_CAP_STREAMING"),
    XlatEntry::new(0x0800_0000, "V4L2_CAP_META_OUTPUT"),
    XlatEntry::new(0x1000_0000, "V4L2_CAP_TOUCH"),
    XlatEntry::new(0x8000_0000, "V4L2_CAP_DEVICE_CAPS"),
];

const BUF_TYPE_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(1, "V4L2_BUF_TYPE_VIDEO_CAPTURE"),
    XlatEntry::new(2, "V4L2_BUF_TYPE_VIDEO_OUTPUT"),
    XlatEntry::new(3, "V4L2_BUF_TYPE_VIDEO_OVERLAY"),
    XlatEntry::new(4, "V4L2_BUF_TYPE_VBI_CAPTURE"),
    XlatEntry::new(5, "V4L2_BUF_TYPE_VBI_OUTPUT"),
    XlatEntry::new(6, "V4L2_BUF_TYPE_SLICED_VBI_CAPTURE"),
    XlatEntry::new(7, "V4L2_BUF_TYPE_SLICED_VBI_OUTPUT"),
    XlatEntry::new(8, "V4L2_BUF_TYPE_VIDEO_OUTPUT_OVERLAY"),
    XlatEntry::new(9, "V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE"),
    XlatEntry::new(10, "V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE"),
    XlatEntry::new(11, "V4L2_BUF_TYPE_SDR_CAPTURE"),
    XlatEntry::new(12, "V4L2_BUF_TYPE_SDR_OUTPUT"),
    XlatEntry::new(13, "V4L2_BUF_TYPE_META_CAPTURE"),
    XlatEntry::new(14, "V4L2_BUF_TYPE_META_OUTPUT"),
];

const MEMORY_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(1, "V4L2_MEMORY_MMAP"),
    XlatEntry::new(2, "V4L2_MEMORY_USERPTR"),
    XlatEntry::new(3, "V4L2_MEMORY_OVERLAY"),
    XlatEntry::new(4, "V4L2_MEMORY_DMABUF"),
];

const FMT_FLAG_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(0x1, "V4L2_FMT_FLAG_COMPRESSED"),
    XlatEntry::new(0x2, "V4L2_FMT_FLAG_EMULATED"),
    XlatEntry::new(0x4, "V4L2_FMT_FLAG_CONTINUOUS_BYTESTREAM"),
    XlatEntry::new(0x8, "V4L2_FMT_FLAG_DYN_RESOLUTION"),
];

const FIELD_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(0, "V4L2_FIELD_ANY"),
    XlatEntry::new(1, "V4L2_FIELD_NONE"),
    XlatEntry::new(2, "V4L2_FIELD_TOP"),
    XlatEntry::new(3, "V4L2_FIELD_BOTTOM"),
    XlatEntry::new(4, "V4L2_FIELD_INTERLACED"),
    XlatEntry::new(5, "V4L2_FIELD_SEQ_TB"),
    XlatEntry::new(6, "V4L2_FIELD_SEQ_BT"),
    XlatEntry::new(7, "V4L2_FIELD_ALTERNATE"),
    XlatEntry::new(8, "V4L2_FIELD_INTERLACED_TB"),
    XlatEntry::new(9, "V4L2_FIELD_INTERLACED_BT"),
];

const COLORSPACE_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(0, "V4L2_COLORSPACE_DEFAULT"),
    XlatEntry::new(1, "V4L2_COLORSPACE_SMPTE170M"),
    XlatEntry::new(2, "V4L2_COLORSPACE_SMPTE240M"),
    XlatEntry::new(3, "V4L2_COLORSPACE_REC709"),
    XlatEntry::new(4, "V4L2_COLORSPACE_BT878"),
    XlatEntry::new(5, "V4L2_COLORSPACE_470_SYSTEM_M"),
    XlatEntry::new(6, "V4L2_COLORSPACE_470_SYSTEM_BG"),
    XlatEntry::new(7, "V4L2_COLORSPACE_JPEG"),
    XlatEntry::new(8, "V4L2_COLORSPACE_SRGB"),
    XlatEntry::new(9, "V4L2_COLORSPACE_OPRGB"),
    XlatEntry::new(10, "V4L2_COLORSPACE_BT2020"),
    XlatEntry::new(11, "V4L2_COLORSPACE_RAW"),
    XlatEntry::new(12, "V4L2_COLORSPACE_DCI_P3"),
];

const INPUT_TYPE_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(1, "V4L2_INPUT_TYPE_TUNER"),
    XlatEntry::new(2, "V4L2_INPUT_TYPE_CAMERA"),
    XlatEntry::new(3, "V4L2_INPUT_TYPE_TOUCH"),
];

const PIX_FMT_FLAG_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(0x1, "V4L2_PIX_FMT_FLAG_PREMUL_ALPHA"),
    XlatEntry::new(0x2, "V4L2_PIX_FMT_FLAG_SET_CSC"),
];

const VBI_FLAG_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(0x1, "V4L2_VBI_UNSYNC"),
    XlatEntry::new(0x2, "V4L2_VBI_INTERLACED"),
];

// V4L2_SLICED_VBI_625 is the union of three single-service bits; keeping it
// lets the decomposition collapse the common 625-line service set.
const SLICED_SERVICE_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(0x0001, "V4L2_SLICED_TELETEXT_B"),
    XlatEntry::new(0x0400, "V4L2_SLICED_VPS"),
    XlatEntry::new(0x1000, "V4L2_SLICED_CAPTION_525"),
    XlatEntry::new(0x4000, "V4L2_SLICED_WSS_625"),
    XlatEntry::new(0x4401, "V4L2_SLICED_VBI_625"),
];

const PIXEL_FORMAT_ENTRIES: &[XlatEntry] = &[
    XlatEntry::new(fourcc(b'R', b'G', b'B', b'P') as u64, "V4L2_PIX_FMT_RGB565"),
    XlatEntry::new(fourcc(b'R', b'G', b'B', b'O') as u64, "V4L2_PIX_FMT_RGB555"),
    XlatEntry::new(fourcc(b'B', b'G', b'R', b'3') as u64, "V4L2_PIX_FMT_BGR24"),
    XlatEntry::new(fourcc(b'R', b'G', b'B', b'3') as u64, "V4L2_PIX_FMT_RGB24"),
    XlatEntry::new(fourcc(b'B', b'G', b'R', b'4') as u64, "V4L2_PIX_FMT_BGR32"),
    XlatEntry::new(fourcc(b'R', b'G', b'B', b'4') as u64, "V4L2_PIX_FMT_RGB32"),
    XlatEntry::new(fourcc(b'A', b'R', b'2', b'4') as u64, "V4L2_PIX_FMT_ABGR32"),
    XlatEntry::new(fourcc(b'X', b'R', b'2', b'4') as u64, "V4L2_PIX_FMT_XBGR32"),
    XlatEntry::new(fourcc(b'B', b'A', b'2', b'4') as u64, "V4L2_PIX_FMT_ARGB32"),
    XlatEntry::new(fourcc(b'B', b'X', b'2', b'4') as u64, "V4L2_PIX_FMT_XRGB32"),
    XlatEntry::new(fourcc(b'G', b'R', b'E', b'Y') as u64, "V4L2_PIX_FMT_GREY"),
    XlatEntry::new(fourcc(b'Y', b'1', b'0', b' ') as u64, "V4L2_PIX_FMT_Y10"),
    XlatEntry::new(fourcc(b'Y', b'1', b'2', b' ') as u64, "V4L2_PIX_FMT_Y12"),
    XlatEntry::new(fourcc(b'Y', b'U', b'Y', b'V') as u64, "V4L2_PIX_FMT_YUYV"),
    XlatEntry::new(fourcc(b'Y', b'V', b'Y', b'U') as u64, "V4L2_PIX_FMT_YVYU"),
    XlatEntry::new(fourcc(b'U', b'Y', b'V', b'Y') as u64, "V4L2_PIX_FMT_UYVY"),
    XlatEntry::new(fourcc(b'V', b'Y', b'U', b'Y') as u64, "V4L2_PIX_FMT_VYUY"),
    XlatEntry::new(fourcc(b'N', b'V', b'1', b'2') as u64, "V4L2_PIX_FMT_NV12"),
    XlatEntry::new(fourcc(b'N', b'V', b'2', b'1') as u64, "V4L2_PIX_FMT_NV21"),
    XlatEntry::new(fourcc(b'N', b'V', b'1', b'6') as u64, "V4L2_PIX_FMT_NV16"),
    XlatEntry::new(fourcc(b'N', b'V', b'6', b'1') as u64, "V4L2_PIX_FMT_NV61"),
    XlatEntry::new(fourcc(b'Y', b'U', b'1', b'2') as u64, "V4L2_PIX_FMT_YUV420"),
    XlatEntry::new(fourcc(b'Y', b'V', b'1', b'2') as u64, "V4L2_PIX_FMT_YVU420"),
    XlatEntry::new(fourcc(b'B', b'A', b'8', b'1') as u64, "V4L2_PIX_FMT_SBGGR8"),
    XlatEntry::new(fourcc(b'G', b'B', b'R', b'G') as u64, "V4L2_PIX_FMT_SGBRG8"),
    XlatEntry::new(fourcc(b'G', b'R', b'B', b'G') as u64, "V4L2_PIX_FMT_SGRBG8"),
    XlatEntry::new(fourcc(b'R', b'G', b'G', b'B') as u64, "V4L2_PIX_FMT_SRGGB8"),
    XlatEntry::new(fourcc(b'M', b'J', b'P', b'G') as u64, "V4L2_PIX_FMT_MJPEG"),
    XlatEntry::new(fourcc(b'J', b'P', b'E', b'G') as u64, "V4L2_PIX_FMT_JPEG"),
    XlatEntry::new(fourcc(b'J', b'P', b'G', b'L') as u64, "V4L2_PIX_FMT_JPGL"),
    XlatEntry::new(fourcc(b'H', b'2', b'6', b'3') as u64, "V4L2_PIX_FMT_H263"),
    XlatEntry::new(fourcc(b'H', b'2', b'6', b'4') as u64, "V4L2_PIX_FMT_H264"),
    XlatEntry::new(fourcc(b'H', b'E', b'V', b'C') as u64, "V4L2_PIX_FMT_HEVC"),
    XlatEntry::new(fourcc(b'M', b'P', b'G', b'2') as u64, "V4L2_PIX_FMT_MPEG2"),
    XlatEntry::new(fourcc(b'M', b'P', b'G', b'4') as u64, "V4L2_PIX_FMT_MPEG4"),
    XlatEntry::new(fourcc(b'V', b'P', b'8', b'0') as u64, "V4L2_PIX_FMT_VP8"),
    XlatEntry::new(fourcc(b'V', b'P', b'9', b'0') as u64, "V4L2_PIX_FMT_VP9"),
    XlatEntry::new(fourcc(b'C', b'U', b'0', b'8') as u64, "V4L2_SDR_FMT_CU8"),
    XlatEntry::new(fourcc(b'C', b'U', b'1', b'6') as u64, "V4L2_SDR_FMT_CU16LE"),
    XlatEntry::new(fourcc(b'C', b'S', b'0', b'8') as u64, "V4L2_SDR_FMT_CS8"),
    XlatEntry::new(fourcc(b'U', b'V', b'C', b'H') as u64, "V4L2_META_FMT_UVC"),
    XlatEntry::new(fourcc(b'V', b'S', b'P', b'H') as u64, "V4L2_META_FMT_VSP1_HGO"),
];

const _: () = assert_unique_table_values();

const fn assert_unique_table_values() {
    assert!(
        has_unique_values(CAPABILITY_ENTRIES),
        "capability bits must be unique"
    );
    assert!(
        has_unique_values(BUF_TYPE_ENTRIES),
        "buffer types must be unique"
    );
    assert!(
        has_unique_values(MEMORY_ENTRIES),
        "memory types must be unique"
    );
    assert!(
        has_unique_values(FMT_FLAG_ENTRIES),
        "format flags must be unique"
    );
    assert!(has_unique_values(FIELD_ENTRIES), "field orders must be unique");
    assert!(
        has_unique_values(COLORSPACE_ENTRIES),
        "colorspaces must be unique"
    );
    assert!(
        has_unique_values(INPUT_TYPE_ENTRIES),
        "input types must be unique"
    );
    assert!(
        has_unique_values(PIX_FMT_FLAG_ENTRIES),
        "pixel format flags must be unique"
    );
    assert!(has_unique_values(VBI_FLAG_ENTRIES), "vbi flags must be unique");
    assert!(
        has_unique_values(SLICED_SERVICE_ENTRIES),
        "sliced vbi services must be unique"
    );
    assert!(
        has_unique_values(PIXEL_FORMAT_ENTRIES),
        "fourcc codes must be unique"
    );
}

/// `V4L2_CAP_*` device capability bits.
pub static CAPABILITIES: XlatTable =
    XlatTable::new("v4l2_device_capabilities_flags", "V4L2_CAP_???", CAPABILITY_ENTRIES);
/// `enum v4l2_buf_type`.
pub static BUF_TYPES: XlatTable =
    XlatTable::new("v4l2_buf_types", "V4L2_BUF_TYPE_???", BUF_TYPE_ENTRIES);
/// `enum v4l2_memory`.
pub static MEMORIES: XlatTable =
    XlatTable::new("v4l2_memories", "V4L2_MEMORY_???", MEMORY_ENTRIES);
/// `V4L2_FMT_FLAG_*` format descriptor flags.
pub static FMT_FLAGS: XlatTable =
    XlatTable::new("v4l2_format_description_flags", "V4L2_FMT_FLAG_???", FMT_FLAG_ENTRIES);
/// `enum v4l2_field`.
pub static FIELDS: XlatTable = XlatTable::new("v4l2_fields", "V4L2_FIELD_???", FIELD_ENTRIES);
/// `enum v4l2_colorspace`.
pub static COLORSPACES: XlatTable =
    XlatTable::new("v4l2_colorspaces", "V4L2_COLORSPACE_???", COLORSPACE_ENTRIES);
/// `V4L2_INPUT_TYPE_*`.
pub static INPUT_TYPES: XlatTable =
    XlatTable::new("v4l2_input_types", "V4L2_INPUT_TYPE_???", INPUT_TYPE_ENTRIES);
/// `V4L2_PIX_FMT_FLAG_*`.
pub static PIX_FMT_FLAGS: XlatTable =
    XlatTable::new("v4l2_pix_fmt_flags", "V4L2_PIX_FMT_FLAG_???", PIX_FMT_FLAG_ENTRIES);
/// `V4L2_VBI_*` raw VBI flags.
pub static VBI_FLAGS: XlatTable =
    XlatTable::new("v4l2_vbi_flags", "V4L2_VBI_???", VBI_FLAG_ENTRIES);
/// `V4L2_SLICED_*` sliced VBI services.
pub static SLICED_SERVICES: XlatTable =
    XlatTable::new("v4l2_sliced_flags", "V4L2_SLICED_???", SLICED_SERVICE_ENTRIES);
/// Named fourcc codes for pixel, SDR and metadata formats.
pub static PIXEL_FORMATS: XlatTable =
    XlatTable::new("v4l2_pix_fmts", "V4L2_PIX_FMT_???", PIXEL_FORMAT_ENTRIES);

/// Every table, for lookups by symbolic name.
pub static ALL_TABLES: [&XlatTable; 11] = [
    &CAPABILITIES,
    &BUF_TYPES,
    &MEMORIES,
    &FMT_FLAGS,
    &FIELDS,
    &COLORSPACES,
    &INPUT_TYPES,
    &PIX_FMT_FLAGS,
    &VBI_FLAGS,
    &SLICED_SERVICES,
    &PIXEL_FORMATS,
];

/// Finds the value of `name` in any table.
#[must_use]
pub fn symbol_value(name: &str) -> Option<u64> {
    ALL_TABLES.iter().find_map(|table| table.value_of(name))
}
