//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod reset;
pub mod run;
pub mod status;

use crate::Result;
use infra_config::EngineConfig;
use infra_store::{JsonFileStore, SqliteStore};
use norm_engine::Pipeline;

/// Pipeline over the configured SQLite store and JSON tracker file.
pub(crate) type StorePipeline = Pipeline<SqliteStore, JsonFileStore>;

/// Validate `config` and open the pipeline it describes.
pub(crate) fn open_pipeline(config: EngineConfig) -> Result<StorePipeline> {
    config.validate()?;
    let store = SqliteStore::open(&config.store.path)?;
    let tracker = JsonFileStore::new(config.tracker.path.clone());
    Ok(Pipeline::open(config, store, tracker)?)
}
