//! Field formatters that are not plain table lookups.

use crate::quote::char_literal;
use crate::tables::PIXEL_FORMATS;
use crate::xlat::hex;
use crate::XlatStyle;

/// Renders a pointer value: `NULL` or lowercase hex.
#[must_use]
pub fn format_pointer(addr: u64) -> String {
    if addr == 0 {
        "NULL".to_string()
    } else {
        format!("{addr:#x}")
    }
}

/// `v4l2_fourcc(...)` call reconstructing the four characters of `value`.
#[must_use]
pub fn fourcc_macro(value: u32) -> String {
    let [a, b, c, d] = value.to_le_bytes();
    format!(
        "v4l2_fourcc({}, {}, {}, {})",
        char_literal(a),
        char_literal(b),
        char_literal(c),
        char_literal(d)
    )
}

/// Renders a fourcc codec tag.
///
/// Known codes print as the hex value with the character macro in a
/// comment, or in verbose style as the macro with the symbolic name in a
/// comment. Unknown codes print as the bare macro call.
#[must_use]
pub fn format_fourcc(value: u32, style: XlatStyle) -> String {
    let known = PIXEL_FORMATS.lookup(u64::from(value));
    match (style, known) {
        (XlatStyle::Raw, _) => hex(u64::from(value)),
        (XlatStyle::Abbrev, Some(_)) => {
            format!("{} /* {} */", hex(u64::from(value)), fourcc_macro(value))
        }
        (XlatStyle::Verbose, Some(name)) => format!("{} /* {name} */", fourcc_macro(value)),
        (XlatStyle::Abbrev | XlatStyle::Verbose, None) => fourcc_macro(value),
    }
}

/// Renders a `KERNEL_VERSION(major, minor, patch)` packed version.
#[must_use]
pub fn format_kernel_version(value: u32, style: XlatStyle) -> String {
    let call = format!(
        "KERNEL_VERSION({}, {}, {})",
        value >> 16,
        (value >> 8) & 0xff,
        value & 0xff
    );
    match style {
        XlatStyle::Raw => hex(u64::from(value)),
        XlatStyle::Abbrev => call,
        XlatStyle::Verbose => format!("{} /* {call} */", hex(u64::from(value))),
    }
}
