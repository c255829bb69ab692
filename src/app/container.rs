use std::sync::Arc;

use crate::adapters::{AppConfig, FFmpegAdapter, ProgressStore};
use crate::app::cut_interactor::{CutSettings, VideoCutInteractor};
use crate::domain::errors::DomainError;
use crate::engine::DriverSettings;
use crate::ports::{ProgressPort, TrimPort};

pub trait AppContainer: Send + Sync {
    fn cut_interactor(&self) -> Arc<VideoCutInteractor>;
}

pub struct DefaultAppContainer {
    cut_interactor: Arc<VideoCutInteractor>,
}

impl DefaultAppContainer {
    /// Wire the FFmpeg adapter and an in-memory progress store
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        Self::with_trim_port(config, Arc::new(FFmpegAdapter::new()))
    }

    pub fn with_trim_port(
        config: &AppConfig,
        trim_port: Arc<dyn TrimPort>,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let progress_port = Arc::new(ProgressStore::new());
        let settings = CutSettings {
            videos_root: config.videos_root.clone(),
            cuts_root: config.cuts_root.clone(),
            max_concurrent_cuts: config.max_concurrent_cuts,
            driver: DriverSettings {
                program: config.ffmpeg_path.clone(),
                estimator: config.progress_estimator,
                timeout: config.cut_timeout,
            },
        };

        let cut_interactor = Arc::new(VideoCutInteractor::new(
            settings,
            trim_port,
            progress_port as Arc<dyn ProgressPort>,
        ));

        Ok(Self { cut_interactor })
    }
}

impl AppContainer for DefaultAppContainer {
    fn cut_interactor(&self) -> Arc<VideoCutInteractor> {
        Arc::clone(&self.cut_interactor)
    }
}
