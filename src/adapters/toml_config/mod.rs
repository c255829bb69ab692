// TOML config adapter - Layered configuration: CLI > environment > file > defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::adapters::tracing_log::{LogFormat, LogSettings};
use crate::domain::errors::*;
use crate::domain::rules::ProgressEstimator;

/// Files probed, in order, when no explicit config path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["vidcut.toml", "config/vidcut.toml"];

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Resolved orchestrator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Root holding one folder per source video group
    pub videos_root: PathBuf,
    /// Root holding dated cut folders
    pub cuts_root: PathBuf,
    /// Trim tool executable
    pub ffmpeg_path: PathBuf,
    /// Cuts allowed to run at once
    pub max_concurrent_cuts: usize,
    /// Kill the tool after this long; `None` waits forever
    pub cut_timeout: Option<Duration>,
    pub progress_estimator: ProgressEstimator,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            videos_root: PathBuf::from("videos"),
            cuts_root: PathBuf::from("cuts"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            max_concurrent_cuts: num_cpus::get().max(1),
            cut_timeout: Some(Duration::from_secs(600)),
            progress_estimator: ProgressEstimator::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

/// On-disk shape: everything lives under `[vidcut]`, every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    vidcut: FileSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSection {
    videos_root: Option<PathBuf>,
    cuts_root: Option<PathBuf>,
    ffmpeg_path: Option<PathBuf>,
    max_concurrent_cuts: Option<usize>,
    cut_timeout_secs: Option<u64>,
    progress_estimator: Option<ProgressEstimator>,
    log_level: Option<String>,
    log_format: Option<LogFormat>,
}

/// Values given on the command line; `None` leaves the lower layers alone
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub videos_root: Option<PathBuf>,
    pub cuts_root: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub max_concurrent_cuts: Option<usize>,
    pub cut_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl AppConfig {
    /// Build the configuration hierarchy and validate the result.
    ///
    /// An explicit `config_path` must exist; otherwise the first of
    /// [`DEFAULT_CONFIG_PATHS`] found is used, if any.
    pub fn load(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, DomainError> {
        let mut config = AppConfig::default();

        match config_path {
            Some(path) => config.apply_file(path)?,
            None => {
                if let Some(path) = DEFAULT_CONFIG_PATHS
                    .iter()
                    .map(Path::new)
                    .find(|path| path.is_file())
                {
                    config.apply_file(path)?;
                } else {
                    debug!("no configuration file found, using defaults");
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text onto the current values
    pub fn apply_toml(&mut self, content: &str) -> Result<(), DomainError> {
        let parsed: ConfigFile = toml::from_str(content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))?;
        let section = parsed.vidcut;

        if let Some(value) = section.videos_root {
            self.videos_root = value;
        }
        if let Some(value) = section.cuts_root {
            self.cuts_root = value;
        }
        if let Some(value) = section.ffmpeg_path {
            self.ffmpeg_path = value;
        }
        if let Some(value) = section.max_concurrent_cuts {
            self.max_concurrent_cuts = value;
        }
        if let Some(value) = section.cut_timeout_secs {
            self.cut_timeout = timeout_from_secs(value);
        }
        if let Some(value) = section.progress_estimator {
            self.progress_estimator = value;
        }
        if let Some(value) = section.log_level {
            self.log_level = value;
        }
        if let Some(value) = section.log_format {
            self.log_format = value;
        }
        Ok(())
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        self.apply_toml(&content)?;
        info!(path = %path.display(), "loaded configuration file");
        Ok(())
    }

    /// Apply `VIDCUT_*` variables looked up through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(value) = lookup("VIDCUT_VIDEOS_ROOT") {
            self.videos_root = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup("VIDCUT_CUTS_ROOT") {
            self.cuts_root = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup("VIDCUT_FFMPEG_PATH") {
            self.ffmpeg_path = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup("VIDCUT_MAX_CONCURRENT_CUTS") {
            self.max_concurrent_cuts = parse_env("VIDCUT_MAX_CONCURRENT_CUTS", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("VIDCUT_CUT_TIMEOUT_SECS") {
            self.cut_timeout = timeout_from_secs(parse_env("VIDCUT_CUT_TIMEOUT_SECS", &value)?);
            applied += 1;
        }
        if let Some(value) = lookup("VIDCUT_PROGRESS_ESTIMATOR") {
            self.progress_estimator = ProgressEstimator::parse(&value).ok_or_else(|| {
                DomainError::Config(format!("Invalid VIDCUT_PROGRESS_ESTIMATOR: {}", value))
            })?;
            applied += 1;
        }
        if let Some(value) = lookup("VIDCUT_LOG_LEVEL") {
            self.log_level = value;
            applied += 1;
        }
        if let Some(value) = lookup("VIDCUT_LOG_FORMAT") {
            self.log_format = LogFormat::parse(&value).ok_or_else(|| {
                DomainError::Config(format!("Invalid VIDCUT_LOG_FORMAT: {}", value))
            })?;
            applied += 1;
        }

        if applied > 0 {
            debug!(applied, "applied environment overrides");
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(value) = &overrides.videos_root {
            self.videos_root = value.clone();
        }
        if let Some(value) = &overrides.cuts_root {
            self.cuts_root = value.clone();
        }
        if let Some(value) = &overrides.ffmpeg_path {
            self.ffmpeg_path = value.clone();
        }
        if let Some(value) = overrides.max_concurrent_cuts {
            self.max_concurrent_cuts = value;
        }
        if let Some(value) = overrides.cut_timeout_secs {
            self.cut_timeout = timeout_from_secs(value);
        }
        if let Some(value) = &overrides.log_level {
            self.log_level = value.clone();
        }
        if let Some(value) = overrides.log_format {
            self.log_format = value;
        }
    }

    /// Reject values the orchestrator cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_concurrent_cuts == 0 {
            return Err(DomainError::Config(
                "max_concurrent_cuts must be at least 1".to_string(),
            ));
        }
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(DomainError::Config(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                self.log_level
            )));
        }
        if self.ffmpeg_path.as_os_str().is_empty() {
            return Err(DomainError::Config("ffmpeg_path cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.to_lowercase(),
            format: self.log_format,
        }
    }
}

/// 0 disables the bounded wait
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DomainError::Config(format!("Invalid value for {}: {} ({})", key, value, e)))
}
