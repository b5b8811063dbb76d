//! Fixture-driven replay of V4L2 `ioctl` calls through the argument decoder.
//!
//! A fixture describes the traced process's memory and a sequence of calls;
//! [`replay`] prints each call the way the tracer would.

/// Fixture and replay error types.
pub mod errors;
pub use errors::{FixtureError, ReplayError};

/// Fixture text format.
pub mod fixture;
pub use fixture::{parse_fixture, CommandRef, Directive, Fixture, FixtureLine};

/// Replay driver.
pub mod runner;
pub use runner::{fill_pattern, replay, replay_file, ReplayRecord, WriterSink};

#[cfg(test)]
use tempfile as _;
