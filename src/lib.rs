//! vidcut - Video Cut Orchestrator Library
//!
//! Lists a library of source videos, cuts time ranges out of them by driving
//! an external stream-copying trim tool, tracks per-video progress, and
//! serves source videos and finished cuts for streaming.

pub mod adapters;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{CutHandle, DefaultAppContainer, VideoCutInteractor};
pub use domain::errors::{DomainError, ErrorKind, InterruptReason};
pub use domain::model::{CutRequest, CutResult, VideoIdentity};
pub use output::VideoResource;
