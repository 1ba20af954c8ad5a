//! Engine configuration management.
//!
//! Handles loading of the engine configuration from TOML files with
//! environment variable override support.

use crate::error::ConfigError;
use crate::methods::{ConflictPolicy, ForwardMethod, VolatilityMethod};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file read when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "mdnorm.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "MDNORM_";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_CHUNK_SIZE: usize = 10_000;
const MAX_WORKERS: usize = 256;

/// Where extract files are discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory scanned for extract files
    pub dir: PathBuf,
    /// Extension of extract files
    pub extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/extracts"),
            extension: "md".to_string(),
        }
    }
}

/// Destination store and write behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file
    pub path: PathBuf,
    /// Rows per write transaction
    pub chunk_size: usize,
    /// Behaviour on (synthetic id, date) conflicts
    pub conflict_policy: ConflictPolicy,
    /// Files between compactions; 0 disables periodic compaction
    pub compact_every: usize,
    /// Compact once at the end of every run
    pub compact_at_end: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("mdnorm.db"),
            chunk_size: 500,
            conflict_policy: ConflictPolicy::default(),
            compact_every: 100,
            compact_at_end: true,
        }
    }
}

/// Processed-file tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// JSON file holding the processed-file markers
    pub path: PathBuf,
    /// Reprocess tracked files whose content fingerprint changed
    pub reprocess_changed: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("cache/processed_files.json"),
            reprocess_changed: false,
        }
    }
}

/// Forward-curve normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Produce forward rows
    pub enabled: bool,
    /// Method chain
    pub method: ForwardMethod,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            method: ForwardMethod::default(),
        }
    }
}

/// Volatility-surface normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityConfig {
    /// Produce volatility rows
    pub enabled: bool,
    /// Method chain
    pub method: VolatilityMethod,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            method: VolatilityMethod::default(),
        }
    }
}

/// Raw spot persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotConfig {
    /// Persist spot quotes to the spot table
    pub enabled: bool,
}

/// Raw quote persistence, unfitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Persist forward and converted growth-rate quotes to the raw forward table
    pub forward: bool,
    /// Persist volatility quotes to the raw volatility table
    pub volatility: bool,
}

/// Parallel group fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Fit groups on a worker pool
    pub enabled: bool,
    /// Worker threads
    pub workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            workers: 20,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Extract discovery
    #[serde(default)]
    pub source: SourceConfig,

    /// Destination store
    #[serde(default)]
    pub store: StoreConfig,

    /// Processed-file tracker
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Forward curves
    #[serde(default)]
    pub forward: ForwardConfig,

    /// Volatility surfaces
    #[serde(default)]
    pub volatility: VolatilityConfig,

    /// Spot quotes
    #[serde(default)]
    pub spot: SpotConfig,

    /// Raw forward and volatility quotes
    #[serde(default)]
    pub raw: RawConfig,

    /// Parallel fitting
    #[serde(default)]
    pub parallel: ParallelConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            source: SourceConfig::default(),
            store: StoreConfig::default(),
            tracker: TrackerConfig::default(),
            forward: ForwardConfig::default(),
            volatility: VolatilityConfig::default(),
            spot: SpotConfig::default(),
            raw: RawConfig::default(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from `path`, or defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `MDNORM_*` environment variable overrides
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Apply overrides from `lookup`, keyed without the `MDNORM_` prefix.
    ///
    /// Values that do not parse leave the setting unchanged.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("SOURCE_DIR") {
            self.source.dir = PathBuf::from(dir);
        }

        if let Some(path) = lookup("STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }

        if let Some(policy) = lookup("CONFLICT_POLICY") {
            self.store.conflict_policy = policy.parse().unwrap_or(self.store.conflict_policy);
        }

        if let Some(method) = lookup("FORWARD_METHOD") {
            self.forward.method = method.parse().unwrap_or(self.forward.method);
        }

        if let Some(method) = lookup("VOLATILITY_METHOD") {
            self.volatility.method = method.parse().unwrap_or(self.volatility.method);
        }

        if let Some(workers) = lookup("WORKERS") {
            self.parallel.workers = workers.trim().parse().unwrap_or(self.parallel.workers);
        }

        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(path) = lookup("TRACKER_PATH") {
            self.tracker.path = PathBuf::from(path);
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if self.store.chunk_size == 0 || self.store.chunk_size > MAX_CHUNK_SIZE {
            errors.push(format!(
                "store.chunk_size {} must be between 1 and {}",
                self.store.chunk_size, MAX_CHUNK_SIZE
            ));
        }

        if self.parallel.workers == 0 || self.parallel.workers > MAX_WORKERS {
            errors.push(format!(
                "parallel.workers {} must be between 1 and {}",
                self.parallel.workers, MAX_WORKERS
            ));
        }

        if self.source.dir.as_os_str().is_empty() {
            errors.push("source.dir cannot be empty".to_string());
        }

        if self.source.extension.trim_start_matches('.').is_empty() {
            errors.push("source.extension cannot be empty".to_string());
        }

        if self.store.path.as_os_str().is_empty() {
            errors.push("store.path cannot be empty".to_string());
        }

        if self.tracker.path.as_os_str().is_empty() {
            errors.push("tracker.path cannot be empty".to_string());
        }

        let any_table = self.forward.enabled
            || self.volatility.enabled
            || self.spot.enabled
            || self.raw.forward
            || self.raw.volatility;
        if !any_table {
            errors.push("At least one table must be enabled".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file (defaults if missing) with environment overrides, and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn validation_errors(config: &EngineConfig) -> Vec<String> {
        match config.validate() {
            Err(ConfigError::Validation(errors)) => errors,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    // ========================================
    // Defaults
    // ========================================

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.store.chunk_size, 500);
        assert_eq!(config.store.conflict_policy, ConflictPolicy::InsertIfAbsent);
        assert_eq!(config.store.compact_every, 100);
        assert_eq!(config.parallel.workers, 20);
        assert!(!config.tracker.reprocess_changed);
        assert!(!config.spot.enabled);
        assert!(!config.raw.forward);
        assert!(!config.raw.volatility);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = EngineConfig::from_toml_str("[store]\nchunk_size = 50\n").unwrap();
        assert_eq!(config.store.chunk_size, 50);
        assert_eq!(config.store.compact_every, 100);
        assert!(config.store.compact_at_end);
    }

    #[test]
    fn test_unknown_method_is_parse_error() {
        let result = EngineConfig::from_toml_str("[forward]\nmethod = \"cubic\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rendered_config_parses_back() {
        let mut config = EngineConfig::default();
        config.volatility.method = VolatilityMethod::Linear;
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("clough-tocher") || text.contains("\"linear\""));
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    // ========================================
    // Overrides
    // ========================================

    #[test]
    fn test_overrides_apply() {
        let config = EngineConfig::default().with_overrides(overrides(&[
            ("SOURCE_DIR", "/srv/extracts"),
            ("CONFLICT_POLICY", "upsert-overwrite"),
            ("FORWARD_METHOD", "parametric"),
            ("WORKERS", "8"),
        ]));
        assert_eq!(config.source.dir, PathBuf::from("/srv/extracts"));
        assert_eq!(config.store.conflict_policy, ConflictPolicy::UpsertOverwrite);
        assert_eq!(config.forward.method, ForwardMethod::Parametric);
        assert_eq!(config.parallel.workers, 8);
    }

    #[test]
    fn test_unparsable_overrides_are_ignored() {
        let config = EngineConfig::default().with_overrides(overrides(&[
            ("WORKERS", "many"),
            ("VOLATILITY_METHOD", "bicubic"),
        ]));
        assert_eq!(config.parallel.workers, 20);
        assert_eq!(config.volatility.method, VolatilityMethod::CloughTocher);
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("MDNORM_TRACKER_PATH", "/tmp/mdnorm-tracker.json");
        let config = EngineConfig::default().with_env_override();
        assert_eq!(config.tracker.path, PathBuf::from("/tmp/mdnorm-tracker.json"));
        std::env::remove_var("MDNORM_TRACKER_PATH");
    }

    // ========================================
    // Validation
    // ========================================

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = EngineConfig::default();
        config.log_level = "verbose".to_string();
        assert!(validation_errors(&config).iter().any(|e| e.contains("log_level")));
    }

    #[test]
    fn test_validate_valid_log_levels() {
        for level in &["trace", "debug", "info", "warn", "error", "INFO"] {
            let mut config = EngineConfig::default();
            config.log_level = level.to_string();
            assert!(config.validate().is_ok(), "Log level '{}' should be valid", level);
        }
    }

    #[test]
    fn test_validate_chunk_size_bounds() {
        let mut config = EngineConfig::default();
        config.store.chunk_size = 0;
        assert!(validation_errors(&config).iter().any(|e| e.contains("chunk_size")));
        config.store.chunk_size = 20_000;
        assert!(validation_errors(&config).iter().any(|e| e.contains("chunk_size")));
    }

    #[test]
    fn test_validate_workers_bounds() {
        let mut config = EngineConfig::default();
        config.parallel.workers = 0;
        assert!(validation_errors(&config).iter().any(|e| e.contains("workers")));
    }

    #[test]
    fn test_validate_nothing_enabled() {
        let mut config = EngineConfig::default();
        config.forward.enabled = false;
        config.volatility.enabled = false;
        assert!(validation_errors(&config).iter().any(|e| e.contains("enabled")));

        config.raw.volatility = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_multiple_errors() {
        let mut config = EngineConfig::default();
        config.log_level = "invalid".to_string();
        config.store.chunk_size = 0;
        config.source.extension = ".".to_string();
        config.tracker.path = PathBuf::new();
        assert_eq!(validation_errors(&config).len(), 4);
    }
}
