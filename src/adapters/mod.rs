// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod progress_store;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use progress_store::ProgressStore;
pub use toml_config::{AppConfig, ConfigOverrides};
pub use tracing_log::{init_logging, LogFormat, LogSettings};
