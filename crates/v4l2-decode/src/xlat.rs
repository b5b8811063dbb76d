//! Value-to-name symbol tables and their enum/bitmask renderings.
//!
//! Tables are `'static` data built at compile time. Lookups are pure, so
//! tables can be shared across tracing threads without synchronization.

use crate::{LookupError, XlatStyle};

/// A single `(value, name)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XlatEntry {
    /// Numeric value.
    pub value: u64,
    /// Symbolic name printed for `value`.
    pub name: &'static str,
}

impl XlatEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(value: u64, name: &'static str) -> Self {
        Self { value, name }
    }
}

/// Ordered symbol table with an unknown-value marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XlatTable {
    /// Table identifier used in diagnostics.
    pub name: &'static str,
    /// Marker printed in a comment next to values that match nothing,
    /// e.g. `V4L2_BUF_TYPE_???`.
    pub unknown: &'static str,
    /// Entries in declaration order. Order breaks ties during bitmask
    /// decomposition and fixes the order of the rendered names.
    pub entries: &'static [XlatEntry],
}

/// Result of splitting a bitmask into table entries plus unmatched bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Matched names in table declaration order.
    pub names: Vec<&'static str>,
    /// Bits not explained by any matched entry.
    pub residual: u64,
}

/// Returns `true` when no two entries share a value.
#[must_use]
pub const fn has_unique_values(entries: &[XlatEntry]) -> bool {
    let mut i = 0;
    while i < entries.len() {
        let mut j = i + 1;
        while j < entries.len() {
            if entries[i].value == entries[j].value {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Formats `value` in the tracer's hexadecimal notation.
///
/// Lowercase, `0x`-prefixed, no zero padding. Zero prints as a bare `0`.
#[must_use]
pub fn hex(value: u64) -> String {
    if value == 0 {
        "0".to_string()
    } else {
        format!("{value:#x}")
    }
}

impl XlatTable {
    /// Creates a table over `entries`.
    #[must_use]
    pub const fn new(
        name: &'static str,
        unknown: &'static str,
        entries: &'static [XlatEntry],
    ) -> Self {
        Self {
            name,
            unknown,
            entries,
        }
    }

    /// Returns the name of the entry whose value equals `value` exactly.
    #[must_use]
    pub fn lookup(&self, value: u64) -> Option<&'static str> {
        self.entries
            .iter()
            .find_map(|entry| (entry.value == value).then_some(entry.name))
    }

    /// Returns the value for a symbolic name.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find_map(|entry| (entry.name == name).then_some(entry.value))
    }

    /// Greedy decomposition of `value` into table entries.
    ///
    /// Repeatedly takes the entry with the most bits that is still a subset
    /// of the remaining value; equal-weight candidates resolve to the
    /// earlier declared entry. Zero-valued entries never match.
    #[must_use]
    pub fn decompose(&self, value: u64) -> Decomposition {
        let mut taken = vec![false; self.entries.len()];
        let mut remaining = value;

        loop {
            let mut best: Option<usize> = None;
            for (index, entry) in self.entries.iter().enumerate() {
                if taken[index] || entry.value == 0 || entry.value & remaining != entry.value {
                    continue;
                }
                let better = best.map_or(true, |current| {
                    entry.value.count_ones() > self.entries[current].value.count_ones()
                });
                if better {
                    best = Some(index);
                }
            }

            let Some(index) = best else { break };
            taken[index] = true;
            remaining &= !self.entries[index].value;
        }

        let names = self
            .entries
            .iter()
            .zip(taken)
            .filter_map(|(entry, taken)| taken.then_some(entry.name))
            .collect();

        Decomposition {
            names,
            residual: remaining,
        }
    }

    /// Renders `value` as an enumeration member.
    #[must_use]
    pub fn render_enum(&self, value: u64, style: XlatStyle) -> String {
        match (style, self.lookup(value)) {
            (XlatStyle::Raw, _) => hex(value),
            (XlatStyle::Abbrev, Some(name)) => name.to_string(),
            (XlatStyle::Verbose, Some(name)) => format!("{} /* {name} */", hex(value)),
            (XlatStyle::Abbrev | XlatStyle::Verbose, None) => self.unknown_comment(value),
        }
    }

    /// Renders `value` as a set of flags.
    #[must_use]
    pub fn render_bitmask(&self, value: u64, style: XlatStyle) -> String {
        if style == XlatStyle::Raw {
            return hex(value);
        }

        if value == 0 {
            return match (style, self.lookup(0)) {
                (XlatStyle::Verbose, Some(name)) => format!("0 /* {name} */"),
                (_, Some(name)) => name.to_string(),
                (_, None) => "0".to_string(),
            };
        }

        let decomposition = self.decompose(value);
        if decomposition.names.is_empty() {
            return self.unknown_comment(value);
        }

        let mut joined = decomposition.names.join("|");
        if decomposition.residual != 0 {
            joined.push('|');
            joined.push_str(&hex(decomposition.residual));
        }

        match style {
            XlatStyle::Verbose => format!("{} /* {joined} */", hex(value)),
            XlatStyle::Raw | XlatStyle::Abbrev => joined,
        }
    }

    /// Parses a rendered bitmask (`A|B|0x10`, a bare number, or a number
    /// followed by a `/* ... */` comment) back into its numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownSymbol`] for a name missing from the
    /// table and [`LookupError::InvalidLiteral`] for malformed numbers.
    pub fn parse_bitmask(&self, text: &str) -> Result<u64, LookupError> {
        let body = text
            .find("/*")
            .map_or(text, |comment_start| &text[..comment_start]);

        body.split('|')
            .map(str::trim)
            .try_fold(0_u64, |acc, token| {
                let value = match self.value_of(token) {
                    Some(value) => value,
                    None if token.starts_with(|c: char| c.is_ascii_digit()) => {
                        parse_literal(token)?
                    }
                    None => {
                        return Err(LookupError::UnknownSymbol {
                            table: self.name,
                            symbol: token.to_string(),
                        })
                    }
                };
                Ok(acc | value)
            })
    }

    fn unknown_comment(&self, value: u64) -> String {
        format!("{} /* {} */", hex(value), self.unknown)
    }
}

/// Parses a C-style unsigned literal: `0x` hex or decimal.
///
/// # Errors
///
/// Returns [`LookupError::InvalidLiteral`] when `token` is not a number.
pub fn parse_literal(token: &str) -> Result<u64, LookupError> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => token.parse::<u64>(),
    };
    parsed.map_err(|_| LookupError::InvalidLiteral(token.to_string()))
}

/// Renders `value` as a member of `table` in the default style.
#[must_use]
pub fn resolve_enum(table: &XlatTable, value: u64) -> String {
    table.render_enum(value, XlatStyle::Abbrev)
}

/// Renders `value` as a flag set of `table` in the default style.
#[must_use]
pub fn resolve_bitmask(table: &XlatTable, value: u64) -> String {
    table.render_bitmask(value, XlatStyle::Abbrev)
}
