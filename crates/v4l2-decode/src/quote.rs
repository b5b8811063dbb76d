//! String quoting shared by every text-bearing field.

/// Quotes at most `max_length` bytes of `bytes` in C string syntax.
///
/// Printable ASCII is copied, `"` and `\` are backslash-escaped, the usual
/// control characters use their C escapes and every other byte is an octal
/// escape. Octal escapes use the shortest form unless the next emitted
/// character is an octal digit. Trailing NUL bytes are not trimmed.
#[must_use]
pub fn quote(bytes: &[u8], max_length: usize) -> String {
    let window = &bytes[..bytes.len().min(max_length)];
    let mut out = String::with_capacity(window.len() + 2);
    out.push('"');

    for (index, &byte) in window.iter().enumerate() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            0x0b => out.push_str("\\v"),
            0x0c => out.push_str("\\f"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => {
                let next_is_octal_digit = window
                    .get(index + 1)
                    .is_some_and(|next| (b'0'..=b'7').contains(next));
                if next_is_octal_digit {
                    out.push_str(&format!("\\{byte:03o}"));
                } else {
                    out.push_str(&format!("\\{byte:o}"));
                }
            }
        }
    }

    out.push('"');
    out
}

/// Quotes a fixed-size, NUL-terminated character array.
///
/// Stops at the first NUL inside the window. Without a terminator the
/// whole window is quoted; nothing past `window.len()` is ever consulted.
#[must_use]
pub fn quote_cstring(window: &[u8]) -> String {
    let end = window
        .iter()
        .position(|byte| *byte == 0)
        .unwrap_or(window.len());
    quote(&window[..end], end)
}

/// Renders one byte as a C character literal, using `\xNN` for anything
/// that is not printable.
#[must_use]
pub fn char_literal(byte: u8) -> String {
    match byte {
        b'\'' => "'\\''".to_string(),
        b'\\' => "'\\\\'".to_string(),
        0x20..=0x7e => format!("'{}'", char::from(byte)),
        _ => format!("'\\x{byte:02x}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::{char_literal, quote, quote_cstring};

    #[test]
    fn printable_ascii_is_verbatim() {
        assert_eq!(quote(b"uvcvideo", 16), "\"uvcvideo\"");
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(quote(b"a\"b\\c", 8), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn control_characters_use_c_escapes() {
        assert_eq!(quote(b"\t\n\x0b\x0c\r", 8), "\"\\t\\n\\v\\f\\r\"");
    }

    #[test]
    fn octal_escapes_widen_before_digits() {
        assert_eq!(quote(&[0x80, 0x81], 2), "\"\\200\\201\"");
        assert_eq!(quote(&[0x01, b'a'], 2), "\"\\1a\"");
        assert_eq!(quote(&[0x01, b'7'], 2), "\"\\0017\"");
        assert_eq!(quote(&[0x01, b'8'], 2), "\"\\18\"");
    }

    #[test]
    fn window_limits_output_and_keeps_trailing_nul() {
        assert_eq!(quote(b"abcdef", 3), "\"abc\"");
        assert_eq!(quote(b"ab\0", 3), "\"ab\\0\"");
        assert_eq!(quote(b"", 3), "\"\"");
    }

    #[test]
    fn cstring_stops_at_terminator_or_window_end() {
        assert_eq!(quote_cstring(b"vivid\0garbage"), "\"vivid\"");
        assert_eq!(quote_cstring(b"full"), "\"full\"");
        assert_eq!(quote_cstring(b"\0xyz"), "\"\"");
    }

    #[test]
    fn char_literals() {
        assert_eq!(char_literal(b'J'), "'J'");
        assert_eq!(char_literal(0x0d), "'\\x0d'");
        assert_eq!(char_literal(0xed), "'\\xed'");
        assert_eq!(char_literal(b'\''), "'\\''");
        assert_eq!(char_literal(b'\\'), "'\\\\'");
    }
}
