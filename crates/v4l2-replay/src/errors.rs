//! Error types for fixture parsing and replay.
//!
//! Every error carries the 1-indexed fixture line it came from and formats
//! as `line N: message`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use v4l2_decode::{LookupError, ReadFault};

/// Malformed fixture text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// The directive keyword is not recognized.
    #[error("line {line}: unknown directive `{directive}`")]
    UnknownDirective {
        /// 1-indexed line number.
        line: usize,
        /// Offending keyword.
        directive: String,
    },
    /// A directive has the wrong shape.
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-indexed line number.
        line: usize,
        /// What was expected.
        message: String,
    },
    /// A number, symbol or hex byte string could not be resolved.
    #[error("line {line}: {source}")]
    Lookup {
        /// 1-indexed line number.
        line: usize,
        /// Underlying lookup failure.
        source: LookupError,
    },
    /// The errno name is not known.
    #[error("line {line}: unknown errno `{name}`")]
    UnknownErrno {
        /// 1-indexed line number.
        line: usize,
        /// Offending name.
        name: String,
    },
}

/// Failure while replaying a parsed fixture.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The fixture file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Fixture path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The fixture text is malformed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// A memory directive touched addresses outside the mapped regions.
    #[error("line {line}: {source}")]
    Memory {
        /// 1-indexed line number.
        line: usize,
        /// Underlying memory fault.
        source: ReadFault,
    },
    /// An `ioctl` directive named a command missing from the table.
    #[error("line {line}: {source}")]
    Command {
        /// 1-indexed line number.
        line: usize,
        /// Underlying lookup failure.
        source: LookupError,
    },
    /// A record could not be serialized.
    #[error("failed to encode record: {0}")]
    Json(#[from] serde_json::Error),
}
