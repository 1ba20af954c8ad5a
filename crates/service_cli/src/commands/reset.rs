//! Reset command implementation
//!
//! Clears every enabled table and the processed-file tracker without
//! processing any extract.

use infra_config::EngineConfig;
use tracing::info;

use super::open_pipeline;
use crate::Result;

/// Run the reset command
pub fn run(config: EngineConfig) -> Result<()> {
    let mut pipeline = open_pipeline(config)?;
    pipeline.reset()?;
    info!("Reset complete");
    println!("{}", pipeline.status()?);
    Ok(())
}
