//! Error types for extract discovery and reading.

use std::path::PathBuf;
use thiserror::Error;

/// Extract source errors.
///
/// Parsing never fails as a whole; only reaching the files can.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Filesystem error on a specific path
    #[error("IO error on '{path}': {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Extract name not known to the source
    #[error("Extract not found: {0}")]
    NotFound(String),

    /// Extract exists but cannot be read
    #[error("Extract unreadable: {0}")]
    Unreadable(String),
}

impl ExtractError {
    /// Create an IO error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an unreadable-extract error
    pub fn unreadable(name: impl Into<String>) -> Self {
        Self::Unreadable(name.into())
    }
}
