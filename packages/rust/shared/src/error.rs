//! Error types for brochurebuilder.
//!
//! Library crates use [`BrochureError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all brochurebuilder operations.
#[derive(Debug, thiserror::Error)]
pub enum BrochureError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to the chat endpoint.
    ///
    /// Page fetches never surface this — a failed fetch degrades to a
    /// sentinel page instead.
    #[error("network error: {0}")]
    Network(String),

    /// The model's reply could not be interpreted as the expected
    /// structured shape, by either the strict or the fallback parse.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Chat transport or reply-shape error (missing message content,
    /// undecodable stream chunk).
    #[error("chat error: {0}")]
    Chat(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BrochureError>;

impl BrochureError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
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
}
