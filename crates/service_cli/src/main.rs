//! mdnorm - Market Data Normalisation CLI
//!
//! Operational entry point for the normalisation engine.
//!
//! # Commands
//!
//! - `mdnorm run [--reset] [--source <dir>]` - Normalise new extracts
//! - `mdnorm reset` - Clear tables and the processed-file tracker
//! - `mdnorm status` - Show tracked files and table sizes
//! - `mdnorm check` - Validate and print the effective configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires the SQLite store and
//! the JSON file tracker into the engine's pipeline.

use clap::{Parser, Subcommand};
use infra_config::{EngineConfig, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;

pub use error::{CliError, Result};

/// Market data normalisation engine
#[derive(Parser)]
#[command(name = "mdnorm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalise every extract not processed yet
    Run {
        /// Clear tables and tracker first, then process everything
        #[arg(long)]
        reset: bool,

        /// Extract directory, overriding the configured one
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// Clear tables and the processed-file tracker
    Reset,

    /// Show tracked files and table sizes
    Status,

    /// Validate configuration and print effective settings
    Check,
}

fn init_tracing(log_level: &str, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        log_level.to_lowercase()
    };
    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EngineConfig::load_or_default(&cli.config)
        .map_err(CliError::from)?
        .with_env_override();
    init_tracing(&config.log_level, cli.verbose);
    debug!(config = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Run { reset, source } => commands::run::run(config, reset, source)?,
        Commands::Reset => commands::reset::run(config)?,
        Commands::Status => commands::status::run(config)?,
        Commands::Check => commands::check::run(&config, &cli.config)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from(["mdnorm", "-v", "run", "--reset", "--source", "/srv/extracts"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        match cli.command {
            Commands::Run { reset, source } => {
                assert!(reset);
                assert_eq!(source, Some(PathBuf::from("/srv/extracts")));
            }
            _ => panic!("Expected run"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["mdnorm", "status", "-c", "prod.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("prod.toml"));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["mdnorm"]).is_err());
    }
}
