//! Line-oriented fixture format describing a traced process.
//!
//! Each non-empty line is one directive; `#` starts a comment.
//!
//! ```text
//! map   <addr> <len>            # zero-filled region
//! fill  <addr> <len>            # region holding 0x80, 0x81, ... 0xff, 0x80, ...
//! bytes <addr> <hex>            # overwrite mapped bytes
//! u32   <addr> <value>          # overwrite a word; value may be A|B|0x10
//! ioctl <fd> <command> <addr> = <ret> [INJECTED]
//! ioctl <fd> <command> <addr> = -1 <ERRNO>
//! ```

use v4l2_decode::xlat::parse_literal;
use v4l2_decode::{symbol_value, CallOutcome, Errno, LookupError};

use crate::errors::FixtureError;

/// How an `ioctl` directive names its command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRef {
    /// Symbolic `VIDIOC_*` name.
    Name(String),
    /// Raw request code.
    Code(u32),
}

/// One fixture directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Maps `len` bytes at `addr`, zeroed or pattern-filled.
    Map {
        /// Region base.
        addr: u64,
        /// Region length.
        len: usize,
        /// Fill with the rolling `0x80 + i % 0x80` pattern.
        pattern: bool,
    },
    /// Overwrites mapped bytes.
    Bytes {
        /// First byte written.
        addr: u64,
        /// Replacement bytes.
        bytes: Vec<u8>,
    },
    /// Overwrites a 32-bit word in the platform byte order.
    Word {
        /// Word address.
        addr: u64,
        /// Value to store.
        value: u32,
    },
    /// Decodes and prints one call.
    Ioctl {
        /// File descriptor argument.
        fd: i32,
        /// Request.
        command: CommandRef,
        /// Argument pointer.
        addr: u64,
        /// Return of the call.
        outcome: CallOutcome,
        /// Whether the return value was injected.
        injected: bool,
    },
}

/// A directive with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureLine {
    /// 1-indexed source line.
    pub line: usize,
    /// Parsed directive.
    pub directive: Directive,
}

/// Parsed fixture, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixture {
    /// Directives in source order.
    pub lines: Vec<FixtureLine>,
}

impl Fixture {
    /// Number of `ioctl` directives.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line.directive, Directive::Ioctl { .. }))
            .count()
    }
}

/// Parses fixture text.
///
/// # Errors
///
/// Returns the first [`FixtureError`] encountered, tagged with its line.
pub fn parse_fixture(source: &str) -> Result<Fixture, FixtureError> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split_once('#').map_or(raw, |(code, _)| code).trim();
        if text.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let directive = parse_directive(line, &tokens)?;
        lines.push(FixtureLine { line, directive });
    }
    Ok(Fixture { lines })
}

fn parse_directive(line: usize, tokens: &[&str]) -> Result<Directive, FixtureError> {
    match tokens {
        ["map", addr, len] | ["fill", addr, len] => Ok(Directive::Map {
            addr: parse_addr(line, addr)?,
            len: parse_len(line, len)?,
            pattern: tokens[0] == "fill",
        }),
        ["bytes", addr, hex] => Ok(Directive::Bytes {
            addr: parse_addr(line, addr)?,
            bytes: parse_hex_bytes(line, hex)?,
        }),
        ["u32", addr, value] => Ok(Directive::Word {
            addr: parse_addr(line, addr)?,
            value: parse_word(line, value)?,
        }),
        ["ioctl", fd, command, addr, "=", outcome @ ..] => {
            let fd = fd.parse::<i32>().map_err(|_| syntax(line, "invalid fd"))?;
            let command = match parse_literal(command) {
                Ok(code) => CommandRef::Code(
                    u32::try_from(code).map_err(|_| syntax(line, "command code exceeds 32 bits"))?,
                ),
                Err(_) => CommandRef::Name((*command).to_string()),
            };
            let addr = parse_addr(line, addr)?;
            let (outcome, injected) = parse_outcome(line, outcome)?;
            Ok(Directive::Ioctl {
                fd,
                command,
                addr,
                outcome,
                injected,
            })
        }
        ["map" | "fill" | "bytes" | "u32" | "ioctl", ..] => {
            Err(syntax(line, &format!("malformed `{}` directive", tokens[0])))
        }
        [keyword, ..] => Err(FixtureError::UnknownDirective {
            line,
            directive: (*keyword).to_string(),
        }),
        [] => Err(syntax(line, "empty directive")),
    }
}

fn parse_outcome(line: usize, tokens: &[&str]) -> Result<(CallOutcome, bool), FixtureError> {
    match tokens {
        ["-1", errno] => {
            let errno = Errno::from_name(errno).ok_or_else(|| FixtureError::UnknownErrno {
                line,
                name: (*errno).to_string(),
            })?;
            Ok((CallOutcome::Failed(errno), false))
        }
        [value] | [value, "INJECTED"] => {
            let value = value
                .parse::<i64>()
                .ok()
                .filter(|value| *value >= 0)
                .ok_or_else(|| syntax(line, "expected a non-negative return value"))?;
            Ok((CallOutcome::Returned(value), tokens.len() == 2))
        }
        _ => Err(syntax(line, "expected `<ret> [INJECTED]` or `-1 <ERRNO>`")),
    }
}

fn parse_addr(line: usize, token: &str) -> Result<u64, FixtureError> {
    if token == "NULL" {
        return Ok(0);
    }
    parse_literal(token).map_err(|source| FixtureError::Lookup { line, source })
}

fn parse_len(line: usize, token: &str) -> Result<usize, FixtureError> {
    let len = parse_literal(token).map_err(|source| FixtureError::Lookup { line, source })?;
    usize::try_from(len).map_err(|_| syntax(line, "length exceeds the address space"))
}

fn parse_word(line: usize, expr: &str) -> Result<u32, FixtureError> {
    let mut value = 0_u64;
    for part in expr.split('|') {
        value |= match parse_literal(part) {
            Ok(literal) => literal,
            Err(_) => symbol_value(part).ok_or_else(|| FixtureError::Lookup {
                line,
                source: LookupError::UnknownSymbol {
                    table: "v4l2 symbols",
                    symbol: part.to_string(),
                },
            })?,
        };
    }
    u32::try_from(value).map_err(|_| syntax(line, "value exceeds 32 bits"))
}

fn parse_hex_bytes(line: usize, hex: &str) -> Result<Vec<u8>, FixtureError> {
    let digits = hex.as_bytes();
    if digits.len() % 2 != 0 {
        return Err(syntax(line, "hex byte string has an odd length"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| FixtureError::Lookup {
                    line,
                    source: LookupError::InvalidLiteral(hex.to_string()),
                })
        })
        .collect()
}

fn syntax(line: usize, message: &str) -> FixtureError {
    FixtureError::Syntax {
        line,
        message: message.to_string(),
    }
}
