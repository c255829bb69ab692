//! CLI module for vidcut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::{ConfigOverrides, LogFormat};

pub mod args;
pub mod commands;

/// vidcut - Video Cut Orchestrator
///
/// Lists source videos, cuts time ranges out of them with a stream-copying
/// trim tool, and serves both sources and finished cuts.
#[derive(Parser, Debug)]
#[command(name = "vidcut")]
#[command(about = "vidcut - Cut time ranges out of a video library")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: vidcut.toml, then config/vidcut.toml)
    #[arg(long, global = true, env = "VIDCUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format: pretty, compact or json
    #[arg(long, global = true, value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Root holding the source video folders
    #[arg(long, global = true)]
    pub videos_root: Option<PathBuf>,

    /// Root holding the dated cut folders
    #[arg(long, global = true)]
    pub cuts_root: Option<PathBuf>,

    /// Trim tool executable
    #[arg(long, global = true)]
    pub ffmpeg: Option<PathBuf>,

    /// Cuts allowed to run at once
    #[arg(long, global = true)]
    pub max_concurrent_cuts: Option<usize>,

    /// Kill a cut after this many seconds (0 waits forever)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List source folders
    Folders,
    /// List the videos of a source folder
    Videos(args::VideosArgs),
    /// List dated cut folders, or the cuts of one date
    Cuts(args::CutsArgs),
    /// Cut a time range out of a video
    Cut(args::CutArgs),
    /// Show (and optionally copy) a source video or a finished cut
    Resource(args::ResourceArgs),
}

impl Cli {
    /// Command-line layer of the configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            videos_root: self.videos_root.clone(),
            cuts_root: self.cuts_root.clone(),
            ffmpeg_path: self.ffmpeg.clone(),
            max_concurrent_cuts: self.max_concurrent_cuts,
            cut_timeout_secs: self.timeout_secs,
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    LogFormat::parse(value)
        .ok_or_else(|| format!("unknown log format '{}', expected pretty, compact or json", value))
}
