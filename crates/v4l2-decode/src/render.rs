//! Output assembler: one `ioctl(...) = ...` trace line per call.

use std::fmt;

use crate::dispatch::RenderedArgument;

/// Errno values the assembler knows by name, with their `strerror` text.
const ERRNOS: [(i32, &str, &str); 12] = [
    (1, "EPERM", "Operation not permitted"),
    (2, "ENOENT", "No such file or directory"),
    (5, "EIO", "Input/output error"),
    (9, "EBADF", "Bad file descriptor"),
    (11, "EAGAIN", "Resource temporarily unavailable"),
    (12, "ENOMEM", "Cannot allocate memory"),
    (14, "EFAULT", "Bad address"),
    (16, "EBUSY", "Device or resource busy"),
    (19, "ENODEV", "No such device"),
    (22, "EINVAL", "Invalid argument"),
    (25, "ENOTTY", "Inappropriate ioctl for device"),
    (95, "EOPNOTSUPP", "Operation not supported"),
];

/// Error number reported by a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Errno(pub i32);

impl Errno {
    /// Looks an errno up by its symbolic name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ERRNOS
            .iter()
            .find(|(_, known, _)| *known == name)
            .map(|(code, _, _)| Self(*code))
    }

    /// Symbolic name, or `ERRNO_<n>` for numbers outside the table.
    #[must_use]
    pub fn name(self) -> String {
        ERRNOS
            .iter()
            .find(|(code, _, _)| *code == self.0)
            .map_or_else(|| format!("ERRNO_{}", self.0), |(_, name, _)| (*name).to_string())
    }

    /// `strerror` text.
    #[must_use]
    pub fn message(self) -> String {
        ERRNOS
            .iter()
            .find(|(code, _, _)| *code == self.0)
            .map_or_else(
                || format!("Unknown error {}", self.0),
                |(_, _, message)| (*message).to_string(),
            )
    }
}

/// How the traced call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CallOutcome {
    /// Non-negative return value.
    Returned(i64),
    /// `-1` with `errno` set.
    Failed(Errno),
}

impl CallOutcome {
    /// Returns `true` for calls whose argument was written back.
    #[must_use]
    pub const fn succeeded(self) -> bool {
        matches!(self, Self::Returned(_))
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Returned(value) => write!(f, "{value}"),
            Self::Failed(errno) => write!(f, "-1 {} ({})", errno.name(), errno.message()),
        }
    }
}

/// Fully assembled trace line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TraceLine {
    /// File descriptor argument.
    pub fd: i32,
    /// `VIDIOC_*` name or `_IOC(...)` expression.
    pub command: String,
    /// Rendered third argument.
    pub argument: String,
    /// Return of the call.
    pub outcome: CallOutcome,
    /// Set when the return value was injected by the tracer.
    pub injected: bool,
}

impl TraceLine {
    /// Assembles a line from a dispatcher result.
    #[must_use]
    pub fn new(
        fd: i32,
        command: impl Into<String>,
        argument: &RenderedArgument,
        outcome: CallOutcome,
    ) -> Self {
        Self {
            fd,
            command: command.into(),
            argument: argument.render(),
            outcome,
            injected: false,
        }
    }

    /// Marks the return value as injected.
    #[must_use]
    pub const fn injected(mut self, injected: bool) -> Self {
        self.injected = injected;
        self
    }
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ioctl({}, {}, {}) = {}",
            self.fd, self.command, self.argument, self.outcome
        )?;
        if self.injected {
            f.write_str(" (INJECTED)")?;
        }
        Ok(())
    }
}
