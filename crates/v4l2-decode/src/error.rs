//! Error taxonomy for the few decoder seams that can genuinely fail.
//!
//! Decoding itself never fails: unreadable or short arguments are reported
//! through [`crate::Availability`] and unknown values through the symbol
//! table fallbacks. These errors cover the memory transport and symbolic
//! lookups only.

use thiserror::Error;

/// Failure reported by a [`crate::MemoryTransport`] for a single read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ReadFault {
    /// The start address is not backed by any mapping in the traced process.
    #[error("address {addr:#x} is not mapped")]
    Unmapped {
        /// First address of the failed read.
        addr: u64,
    },
    /// The requested range does not fit in the traced address space.
    #[error("range of {len} bytes at {addr:#x} overflows the address space")]
    AddressOverflow {
        /// First address of the failed read.
        addr: u64,
        /// Requested byte count.
        len: usize,
    },
    /// Transport-specific failure (detached process, permission denied, ...).
    #[error("transport failed reading {addr:#x}: {reason}")]
    Transport {
        /// First address of the failed read.
        addr: u64,
        /// Human-readable transport diagnostic.
        reason: String,
    },
}

/// Failure resolving a symbolic name to its numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum LookupError {
    /// No command with this symbolic name exists in the command table.
    #[error("unknown ioctl command `{0}`")]
    UnknownCommand(String),
    /// A `|`-joined expression referenced a name missing from the table.
    #[error("`{symbol}` is not a member of {table}")]
    UnknownSymbol {
        /// Name of the table that was searched.
        table: &'static str,
        /// Offending symbol.
        symbol: String,
    },
    /// A numeric literal in a symbolic expression could not be parsed.
    #[error("invalid numeric literal `{0}`")]
    InvalidLiteral(String),
}

#[cfg(test)]
mod tests {
    use super::{LookupError, ReadFault};

    #[test]
    fn read_fault_messages_use_lowercase_hex_addresses() {
        let fault = ReadFault::Unmapped { addr: 0xdead_0000 };
        assert_eq!(fault.to_string(), "address 0xdead0000 is not mapped");
    }

    #[test]
    fn lookup_error_names_the_table() {
        let err = LookupError::UnknownSymbol {
            table: "v4l2_memories",
            symbol: "V4L2_MEMORY_BOGUS".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`V4L2_MEMORY_BOGUS` is not a member of v4l2_memories"
        );
    }
}
