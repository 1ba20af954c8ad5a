//! CLI error types.

use infra_config::ConfigError;
use infra_store::StoreError;
use norm_engine::EngineError;
use thiserror::Error;

/// Errors surfaced by `mdnorm` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Pipeline failure
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Extract directory does not exist
    #[error("Source directory not found: {0}")]
    SourceNotFound(String),
}

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_wrapped() {
        let err: CliError = ConfigError::Validation(vec!["store.chunk_size 0".to_string()]).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Validation errors: store.chunk_size 0"
        );
    }
}
