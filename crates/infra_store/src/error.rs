//! Error types for table stores and key-value stores.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row violates a table constraint
    #[error("Constraint violation on {table}: {message}")]
    Constraint {
        /// Table name
        table: String,
        /// Violated constraint
        message: String,
    },

    /// Table has not been created
    #[error("No such table: {0}")]
    MissingTable(String),

    /// Maintenance failure
    #[error("Compaction of {table} failed: {message}")]
    Compaction {
        /// Table name
        table: String,
        /// Failure description
        message: String,
    },

    /// Filesystem error on a specific path
    #[error("IO error on '{path}': {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Persisted JSON could not be read or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a constraint violation error
    pub fn constraint(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Constraint {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create an IO error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
