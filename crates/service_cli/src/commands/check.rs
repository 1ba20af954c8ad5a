//! Check command implementation
//!
//! Validates the effective configuration (file plus environment overrides)
//! and prints it.

use std::path::Path;

use infra_config::EngineConfig;
use tracing::info;

use crate::Result;

/// Run the check command
pub fn run(config: &EngineConfig, path: &Path) -> Result<()> {
    info!("Checking configuration...");
    if path.exists() {
        info!("  Config file: {}", path.display());
    } else {
        info!("  Config file: {} (not found, using defaults)", path.display());
    }

    config.validate()?;
    println!("{}", config.to_toml_string()?);

    info!("Configuration OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;
    use infra_config::ConfigError;

    #[test]
    fn test_default_config_passes() {
        assert!(run(&EngineConfig::default(), Path::new("absent.toml")).is_ok());
    }

    #[test]
    fn test_invalid_config_fails() {
        let mut config = EngineConfig::default();
        config.parallel.workers = 0;
        let result = run(&config, Path::new("absent.toml"));
        assert!(matches!(result, Err(CliError::Config(ConfigError::Validation(_)))));
    }
}
