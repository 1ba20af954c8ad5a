//! # infra_config: Engine Configuration
//!
//! Loads [`EngineConfig`] from a TOML file, applies `MDNORM_*` environment
//! overrides and validates the result. Every field has a default, so an
//! empty file (or no file at all) yields a runnable configuration.
//!
//! ## Example
//!
//! ```rust
//! use infra_config::{ConflictPolicy, EngineConfig, ForwardMethod};
//!
//! let config = EngineConfig::from_toml_str(
//!     r#"
//!     [store]
//!     conflict_policy = "upsert-overwrite"
//!
//!     [forward]
//!     method = "monotone"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.store.conflict_policy, ConflictPolicy::UpsertOverwrite);
//! assert_eq!(config.forward.method, ForwardMethod::Monotone);
//! assert_eq!(config.store.chunk_size, 500);
//! assert!(config.validate().is_ok());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod methods;

pub use config::{
    EngineConfig, ForwardConfig, ParallelConfig, RawConfig, SourceConfig, SpotConfig, StoreConfig,
    TrackerConfig, VolatilityConfig, DEFAULT_CONFIG_PATH, ENV_PREFIX,
};
pub use error::ConfigError;
pub use methods::{ConflictPolicy, ForwardMethod, VolatilityMethod};
