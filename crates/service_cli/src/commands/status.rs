//! Status command implementation

use infra_config::EngineConfig;

use super::open_pipeline;
use crate::Result;

/// Print tracked file count and per-table row counts
pub fn run(config: EngineConfig) -> Result<()> {
    let pipeline = open_pipeline(config)?;
    println!("{}", pipeline.status()?);
    Ok(())
}
