//! Error types for the normalisation engine.
//!
//! Only failures that stop a run surface here. Everything recoverable
//! (malformed lines, degenerate groups, failed stages, failed chunks,
//! unreadable files) is logged and counted in the run report instead.

use adapter_extract::ExtractError;
use infra_store::StoreError;
use thiserror::Error;

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Store or tracker failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Extract discovery failure
    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Worker pool could not be started
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl EngineError {
    /// Create a worker pool error
    pub fn worker_pool(message: impl Into<String>) -> Self {
        Self::WorkerPool(message.into())
    }
}
