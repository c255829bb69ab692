//! FFmpeg execution adapter
//!
//! Spawns the trim tool as a child process and forwards its combined
//! stdout/stderr, split into lines, over a channel filled by dedicated
//! reader tasks.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Buffered lines between the reader tasks and the driver
const LINE_CHANNEL_CAPACITY: usize = 256;

/// FFmpeg-based trim adapter
#[derive(Debug, Default, Clone)]
pub struct FFmpegAdapter;

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TrimPort for FFmpegAdapter {
    async fn spawn(&self, invocation: &TrimInvocation) -> Result<Box<dyn TrimProcess>, DomainError> {
        let args = invocation.args();
        debug!(program = %invocation.program.display(), ?args, "spawning trim tool");

        let mut child = Command::new(&invocation.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DomainError::ExternalToolError {
                code: None,
                detail: format!(
                    "failed to start {}: {}",
                    invocation.program.display(),
                    e
                ),
            })?;

        let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, tx));
        }

        Ok(Box::new(FFmpegProcess {
            program: invocation.program.clone(),
            child,
            lines: rx,
        }))
    }
}

/// Running FFmpeg child
pub struct FFmpegProcess {
    program: PathBuf,
    child: Child,
    lines: mpsc::Receiver<String>,
}

#[async_trait]
impl TrimProcess for FFmpegProcess {
    async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    async fn wait(&mut self) -> Result<Option<i32>, DomainError> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| DomainError::io(&self.program, e))?;
        Ok(status.code())
    }

    async fn kill(&mut self) -> Result<(), DomainError> {
        if let Ok(Some(_)) = self.child.try_wait() {
            return Ok(());
        }
        self.child
            .kill()
            .await
            .map_err(|e| DomainError::io(&self.program, e))
    }
}

/// Read `reader` to the end, sending each line until the receiver goes away
async fn forward_lines<R>(mut reader: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut splitter = LineSplitter::default();
    let mut buf = [0u8; 4096];

    loop {
        let read = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) => {
                trace!(error = %e, "trim tool output stream closed with error");
                break;
            }
        };
        for line in splitter.push(&buf[..read]) {
            if tx.send(line).await.is_err() {
                return;
            }
        }
    }

    if let Some(line) = splitter.finish() {
        let _ = tx.send(line).await;
    }
}

/// Splits a byte stream on `\n` and `\r`.
///
/// FFmpeg redraws its status line with carriage returns, so both count as
/// line ends. Empty lines are dropped.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    /// Feed a chunk and collect every line it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if byte == b'\n' || byte == b'\r' {
                if let Some(line) = self.take() {
                    lines.push(line);
                }
            } else {
                self.pending.push(byte);
            }
        }
        lines
    }

    /// Flush a trailing line without terminator
    pub fn finish(&mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    #[test]
    fn test_splitter_handles_carriage_returns() {
        let mut splitter = LineSplitter::default();
        let lines = splitter.push(b"Input #0\nframe=1 time=00:00:01.00\rframe=2 time=00:00:02.00\r\n");
        assert_eq!(
            lines,
            vec!["Input #0", "frame=1 time=00:00:01.00", "frame=2 time=00:00:02.00"]
        );
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_splitter_joins_chunks() {
        let mut splitter = LineSplitter::default();
        assert!(splitter.push(b"Stream ma").is_empty());
        assert_eq!(splitter.push(b"pping:\nvid"), vec!["Stream mapping:"]);
        assert_eq!(splitter.finish(), Some("vid".to_string()));
    }

    #[tokio::test]
    async fn test_forward_lines_over_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let input: &[u8] = b"one\rtwo\nthree";
        forward_lines(input, tx).await;

        let mut received = Vec::new();
        while let Some(line) = rx.recv().await {
            received.push(line);
        }
        assert_eq!(received, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_missing_program_is_tool_error() {
        let adapter = FFmpegAdapter::new();
        let invocation = TrimInvocation {
            program: PathBuf::from("/definitely/not/here/ffmpeg"),
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.mp4"),
            start_seconds: 0.0,
            duration_seconds: 1.0,
        };

        let err = match adapter.spawn(&invocation).await {
            Ok(_) => panic!("spawn should fail"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), ErrorKind::ExternalToolError);
    }
}
