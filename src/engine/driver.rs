//! Cut process driver: runs one trim and tracks it through its lifecycle

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{CutProgress, ProgressEstimator};
use crate::ports::*;

/// Tool output lines kept for failure reports
const TAIL_LINES: usize = 5;

/// Static settings shared by every cut
#[derive(Debug, Clone)]
pub struct DriverSettings {
    /// Trim tool executable
    pub program: PathBuf,
    pub estimator: ProgressEstimator,
    /// Bounded wait; the tool is killed when it expires
    pub timeout: Option<Duration>,
}

/// One validated cut, with both ends resolved
#[derive(Debug, Clone)]
pub struct CutJob {
    pub identity: VideoIdentity,
    pub input: PathBuf,
    pub output: PathBuf,
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

enum Step<T> {
    Next(T),
    Stop(InterruptReason),
}

/// Drives `Pending -> Running -> Succeeded | Failed` for each job.
///
/// Progress is written to the shared store as lines arrive. On failure the
/// last written value is left untouched; only success writes 1.0.
pub struct CutDriver {
    trim: Arc<dyn TrimPort>,
    progress: Arc<dyn ProgressPort>,
    settings: DriverSettings,
}

impl CutDriver {
    pub fn new(
        trim: Arc<dyn TrimPort>,
        progress: Arc<dyn ProgressPort>,
        settings: DriverSettings,
    ) -> Self {
        Self {
            trim,
            progress,
            settings,
        }
    }

    /// Run `job` to completion, returning the output path on success
    pub async fn run(
        &self,
        job: &CutJob,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, DomainError> {
        let state = CutState::Pending;
        let result = self.run_from(state, job, cancel).await;

        match &result {
            Ok(path) => info!(
                identity = %job.identity,
                output = %path.display(),
                state = ?CutState::Succeeded,
                "cut finished"
            ),
            Err(e) => warn!(
                identity = %job.identity,
                error = %e,
                progress = self.progress.get(&job.identity),
                state = ?CutState::Failed,
                "cut failed"
            ),
        }
        result
    }

    async fn run_from(
        &self,
        state: CutState,
        job: &CutJob,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, DomainError> {
        if cancel.is_cancelled() {
            return Err(DomainError::interrupted(InterruptReason::Cancelled));
        }

        let invocation = TrimInvocation {
            program: self.settings.program.clone(),
            input: job.input.clone(),
            output: job.output.clone(),
            start_seconds: job.start_seconds,
            duration_seconds: job.duration_seconds,
        };
        let deadline = self.settings.timeout.map(|timeout| Instant::now() + timeout);

        let mut process = self.trim.spawn(&invocation).await?;
        let state = state.advance(CutState::Running)?;
        info!(
            identity = %job.identity,
            start = job.start_seconds,
            duration = job.duration_seconds,
            state = ?state,
            "trim tool started"
        );

        let code = match self.supervise(process.as_mut(), job, cancel, deadline).await {
            Step::Next(code) => code?,
            Step::Stop(reason) => {
                if let Err(e) = process.kill().await {
                    warn!(identity = %job.identity, error = %e, "failed to kill trim tool");
                }
                return Err(DomainError::interrupted(reason));
            }
        };

        let (code, tail) = code;
        if code != Some(0) {
            return Err(DomainError::ExternalToolError {
                code,
                detail: tail,
            });
        }

        match tokio::fs::metadata(&job.output).await {
            Ok(meta) if meta.is_file() && meta.len() > 0 => {}
            _ => {
                return Err(DomainError::ExternalToolError {
                    code,
                    detail: format!("no output written to {}", job.output.display()),
                })
            }
        }

        state.advance(CutState::Succeeded)?;
        self.progress.set(&job.identity, 1.0);
        Ok(job.output.clone())
    }

    /// Stream output into the store, then wait for exit, racing cancel and deadline
    async fn supervise(
        &self,
        process: &mut dyn TrimProcess,
        job: &CutJob,
        cancel: &CancellationToken,
        deadline: Option<Instant>,
    ) -> Step<Result<(Option<i32>, String), DomainError>> {
        let mut progress = CutProgress::new(self.settings.estimator, job.duration_seconds);
        let mut tail: VecDeque<String> = VecDeque::with_capacity(TAIL_LINES);

        loop {
            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => Step::Stop(InterruptReason::Cancelled),
                _ = wait_until(deadline) => Step::Stop(InterruptReason::TimedOut),
                line = process.next_line() => Step::Next(line),
            };

            match step {
                Step::Stop(reason) => return Step::Stop(reason),
                Step::Next(Some(line)) => {
                    let value = progress.observe(&line);
                    self.progress.set(&job.identity, value);
                    debug!(identity = %job.identity, progress = value, line = %line, "trim output");

                    if tail.len() == TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
                Step::Next(None) => break,
            }
        }

        let exit = tokio::select! {
            biased;
            _ = cancel.cancelled() => Step::Stop(InterruptReason::Cancelled),
            _ = wait_until(deadline) => Step::Stop(InterruptReason::TimedOut),
            code = process.wait() => Step::Next(code),
        };

        match exit {
            Step::Stop(reason) => Step::Stop(reason),
            Step::Next(code) => {
                debug!(
                    identity = %job.identity,
                    lines = progress.lines_seen(),
                    "trim tool exited"
                );
                let tail = tail.into_iter().collect::<Vec<_>>().join("\n");
                Step::Next(code.map(|code| (code, tail)))
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
