//! vidcut - Video Cut Orchestrator
//!
//! Cuts time ranges out of a library of videos with a stream-copying trim
//! tool and keeps the results in dated folders.
//!
//! # Usage
//!
//! ```bash
//! vidcut folders
//! vidcut videos demo
//! vidcut cut demo clip.mp4 --start 00:00:02 --duration 5
//! vidcut cuts 2024-05-01
//! vidcut resource 2024-05-01 cut_1714564800000_clip.mp4 --cut
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use vidcut::adapters::{init_logging, AppConfig};
use vidcut::cli::{self, Cli};

/// Main entry point for the vidcut CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Resolve configuration: CLI > environment > file > defaults
    let config = AppConfig::load(cli.config.as_deref(), &cli.overrides())?;
    init_logging(&config.log_settings())?;

    info!("Starting vidcut");
    debug!(?config, "configuration loaded");

    cli::commands::run(cli, config).await?;

    debug!("vidcut completed successfully");
    Ok(())
}
