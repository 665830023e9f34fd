//! TD-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::io;

use thiserror::Error;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, DashError>;

/// Top-level error type for the dashboard runtime.
///
/// Producer-facing `update_*` calls never return errors; everything that can
/// go wrong there is absorbed as best-effort rendering. What remains is the
/// startup/teardown path of the terminal itself.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("[TD-1001] terminal initialization failure: {source}")]
    TerminalInit {
        #[source]
        source: io::Error,
    },

    #[error("[TD-1002] terminal io failure during {context}: {source}")]
    TerminalIo {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("[TD-1003] runtime failure: {details}")]
    Runtime { details: String },
}

impl DashError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TerminalInit { .. } => "TD-1001",
            Self::TerminalIo { .. } => "TD-1002",
            Self::Runtime { .. } => "TD-1003",
        }
    }

    /// True for failures that abort startup rather than degrade rendering.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::TerminalInit { .. })
    }
}
