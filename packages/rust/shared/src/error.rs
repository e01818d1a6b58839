//! Error types for basin-recipes.
//!
//! Library crates use [`BasinError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all manifest-building operations.
#[derive(Debug, thiserror::Error)]
pub enum BasinError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed section database.
    #[error("parse error in {path:?} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A required key is absent from a database section.
    #[error("missing field `{key}` in section [{group}] of {path:?}")]
    MissingField {
        path: PathBuf,
        group: String,
        key: String,
    },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory traversal error.
    #[error("failed to walk {path:?}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Manifest serialization or integrity error.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BasinError>;

impl BasinError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error for a specific file and 1-based line.
    pub fn parse(path: impl Into<PathBuf>, line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn missing_field(
        path: impl Into<PathBuf>,
        group: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::MissingField {
            path: path.into(),
            group: group.into(),
            key: key.into(),
        }
    }
}
