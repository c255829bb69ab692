// Cut interactor - Orchestrates listing, cutting and serving videos

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{CutDriver, CutJob, DriverSettings};
use crate::output::{OutputNamer, VideoResource};
use crate::ports::*;

/// Roots and limits for a [`VideoCutInteractor`]
#[derive(Debug, Clone)]
pub struct CutSettings {
    pub videos_root: PathBuf,
    pub cuts_root: PathBuf,
    pub max_concurrent_cuts: usize,
    pub driver: DriverSettings,
}

/// Completion handle for a submitted cut
#[derive(Debug)]
pub struct CutHandle {
    identity: VideoIdentity,
    output_path: PathBuf,
    cancel: CancellationToken,
    task: JoinHandle<Result<CutResult, DomainError>>,
}

impl CutHandle {
    pub fn identity(&self) -> &VideoIdentity {
        &self.identity
    }

    /// Path the tool has been told to write
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Ask the cut to stop; `wait` then yields `Interrupted`
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the cut to finish
    pub async fn wait(self) -> Result<CutResult, DomainError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                warn!(identity = %self.identity, error = %e, "cut task aborted");
                Err(DomainError::interrupted(InterruptReason::Aborted))
            }
        }
    }
}

/// Interactor for the video cut use cases
pub struct VideoCutInteractor {
    videos: Catalog,
    cuts: Catalog,
    namer: Arc<OutputNamer>,
    driver: Arc<CutDriver>,
    progress: Arc<dyn ProgressPort>,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
}

impl VideoCutInteractor {
    /// Create new cut interactor with injected ports
    pub fn new(
        settings: CutSettings,
        trim_port: Arc<dyn TrimPort>,
        progress_port: Arc<dyn ProgressPort>,
    ) -> Self {
        let driver = CutDriver::new(trim_port, Arc::clone(&progress_port), settings.driver);
        Self {
            videos: Catalog::new(settings.videos_root),
            cuts: Catalog::new(&settings.cuts_root),
            namer: Arc::new(OutputNamer::new(settings.cuts_root)),
            driver: Arc::new(driver),
            progress: progress_port,
            permits: Arc::new(Semaphore::new(settings.max_concurrent_cuts.max(1))),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn list_folders(&self) -> Result<Vec<String>, DomainError> {
        self.videos.list_folders()
    }

    pub fn list_videos(&self, folder: &str) -> Result<Vec<String>, DomainError> {
        self.videos.list_videos(folder)
    }

    /// Dated cut folders; empty until the first cut creates the cuts root
    pub fn list_cut_folders(&self) -> Result<Vec<String>, DomainError> {
        if !self.cuts.resolver().root().exists() {
            return Ok(Vec::new());
        }
        self.cuts.list_folders()
    }

    pub fn list_cut_videos(&self, date: &str) -> Result<Vec<String>, DomainError> {
        self.cuts.list_videos(date)
    }

    /// Validate `request`, reserve its output and start it in the background
    pub async fn submit(&self, request: CutRequest) -> Result<CutHandle, DomainError> {
        if self.shutdown.is_cancelled() {
            return Err(DomainError::interrupted(InterruptReason::Cancelled));
        }

        let input = self
            .videos
            .resolver()
            .resolve_file(request.folder(), request.file_name())?;
        let slot = self.namer.reserve(&Local::now(), request.file_name())?;

        let identity = request.identity().clone();
        let job = CutJob {
            identity: identity.clone(),
            input,
            output: slot.path.clone(),
            start_seconds: request.start_seconds(),
            duration_seconds: request.duration_seconds(),
        };
        info!(
            identity = %identity,
            output = %slot.path.display(),
            "cut submitted"
        );

        let cancel = self.shutdown.child_token();
        let token = cancel.clone();
        let driver = Arc::clone(&self.driver);
        let permits = Arc::clone(&self.permits);
        let folder = slot.folder;

        let task = tokio::spawn(async move {
            let _permit = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return Err(DomainError::interrupted(InterruptReason::Cancelled));
                }
                permit = permits.acquire_owned() => permit
                    .map_err(|_| DomainError::interrupted(InterruptReason::Aborted))?,
            };
            debug!(identity = %job.identity, "cut permit acquired");

            let output_path = driver.run(&job, &token).await?;
            Ok::<_, DomainError>(CutResult {
                output_path,
                output_folder: folder,
            })
        });

        Ok(CutHandle {
            identity,
            output_path: slot.path,
            cancel,
            task,
        })
    }

    /// Run one cut and wait for it
    pub async fn cut(&self, request: CutRequest) -> Result<CutResult, DomainError> {
        self.submit(request).await?.wait().await
    }

    /// Last progress for a video, 0.0 if it was never cut
    pub fn progress(&self, folder: &str, file_name: &str) -> f64 {
        self.progress.get(&VideoIdentity::new(folder, file_name))
    }

    pub fn progress_snapshot(&self) -> Vec<(VideoIdentity, f64)> {
        self.progress.snapshot()
    }

    /// Open a source video for streaming
    pub async fn load_resource(
        &self,
        folder: &str,
        file_name: &str,
    ) -> Result<VideoResource, DomainError> {
        let path = self.videos.resolver().resolve_file(folder, file_name)?;
        VideoResource::open(path).await
    }

    /// Open a finished cut for streaming
    pub async fn load_cut_resource(
        &self,
        date: &str,
        file_name: &str,
    ) -> Result<VideoResource, DomainError> {
        let path = self.cuts.resolver().resolve_file(date, file_name)?;
        VideoResource::open(path).await
    }

    /// Cancel every in-flight cut and refuse new ones
    pub fn shutdown(&self) {
        info!("shutting down cut interactor");
        self.shutdown.cancel();
    }
}
