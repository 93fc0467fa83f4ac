//! Error types for cratemaker.
//!
//! Library crates use [`CrateMakerError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all cratemaker operations.
#[derive(Debug, thiserror::Error)]
pub enum CrateMakerError {
    /// A required input file (config, notebook, metadata) does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Malformed JSON, or JSON of the wrong top-level shape.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A document parsed but is missing an expected key or nesting.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// The target file or directory could not be written.
    #[error("write error at {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Any other filesystem read error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CrateMakerError>;

impl CrateMakerError {
    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a schema error from any displayable message.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a read-side `std::io::Error` with a path for context.
    ///
    /// A missing file becomes [`CrateMakerError::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound { path };
        }
        Self::Io { path, source }
    }

    /// Wrap a write-side `std::io::Error` with a path for context.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
