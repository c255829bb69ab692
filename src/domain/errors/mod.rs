// Domain errors - Failure taxonomy surfaced to every caller of the orchestrator

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a running cut stopped before the tool exited on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptReason {
    /// The caller or the host cancelled the cut
    Cancelled,
    /// The bounded wait expired and the tool was killed
    TimedOut,
    /// The task running the cut went away (panic or runtime shutdown)
    Aborted,
}

impl fmt::Display for InterruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptReason::Cancelled => write!(f, "cancelled"),
            InterruptReason::TimedOut => write!(f, "timed out"),
            InterruptReason::Aborted => write!(f, "aborted"),
        }
    }
}

/// Domain-specific error types
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// Folder or file does not exist, or is not readable
    #[error("Not found: {0}")]
    NotFound(String),

    /// Name would resolve outside its configured root
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Directory or file creation, or any other disk error
    #[error("I/O failure on {}: {message}", .path.display())]
    IoFailure { path: PathBuf, message: String },

    /// Trim tool finished unsuccessfully
    #[error("Trim tool failed (exit code {}): {detail}", fmt_code(.code))]
    ExternalToolError { code: Option<i32>, detail: String },

    /// Wait on the trim tool was interrupted
    #[error("Cut interrupted: {reason}")]
    Interrupted { reason: InterruptReason },

    /// Request values are out of range
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable classification of [`DomainError`] for callers that branch on failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidPath,
    IoFailure,
    ExternalToolError,
    Interrupted,
    InvalidRequest,
    Config,
}

impl DomainError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidPath(_) => ErrorKind::InvalidPath,
            DomainError::IoFailure { .. } => ErrorKind::IoFailure,
            DomainError::ExternalToolError { .. } => ErrorKind::ExternalToolError,
            DomainError::Interrupted { .. } => ErrorKind::Interrupted,
            DomainError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            DomainError::Config(_) => ErrorKind::Config,
        }
    }

    /// Wrap an I/O error raised while touching `path`
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        DomainError::IoFailure {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn interrupted(reason: InterruptReason) -> Self {
        DomainError::Interrupted { reason }
    }
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(DomainError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            DomainError::interrupted(InterruptReason::TimedOut).kind(),
            ErrorKind::Interrupted
        );
        let err = DomainError::io("/tmp/x", std::io::Error::other("disk full"));
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }

    #[test]
    fn test_external_tool_message_carries_code() {
        let err = DomainError::ExternalToolError {
            code: Some(1),
            detail: "Invalid data found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Trim tool failed (exit code 1): Invalid data found"
        );

        let killed = DomainError::ExternalToolError {
            code: None,
            detail: String::new(),
        };
        assert!(killed.to_string().contains("exit code none"));
    }
}
