//! Run command implementation
//!
//! Normalises every extract in the source directory that the tracker has not
//! seen yet and prints the run report.

use std::path::PathBuf;

use adapter_extract::DirectorySource;
use infra_config::EngineConfig;
use tracing::info;

use super::open_pipeline;
use crate::{CliError, Result};

/// Run the pipeline
pub fn run(mut config: EngineConfig, reset: bool, source: Option<PathBuf>) -> Result<()> {
    if let Some(dir) = source {
        config.source.dir = dir;
    }
    if !config.source.dir.is_dir() {
        return Err(CliError::SourceNotFound(config.source.dir.display().to_string()));
    }

    info!("Starting normalisation run...");
    info!("  Source: {}", config.source.dir.display());
    info!("  Store: {}", config.store.path.display());
    info!(
        "  Methods: forward={}, volatility={}",
        config.forward.method, config.volatility.method
    );

    let extracts = DirectorySource::new(config.source.dir.clone(), &config.source.extension);
    let mut pipeline = open_pipeline(config)?;
    let report = pipeline.run(&extracts, reset)?;

    println!("{}", report);
    Ok(())
}
