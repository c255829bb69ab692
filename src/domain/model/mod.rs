// Domain models - Core types and data structures

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::errors::DomainError;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Create a new TimeSpec from hours, minutes, seconds, milliseconds
    pub fn from_components(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
        let total_seconds = hours as f64 * 3600.0
            + minutes as f64 * 60.0
            + seconds as f64
            + milliseconds as f64 / 1000.0;
        Self {
            seconds: total_seconds,
        }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string: seconds (`12.5`), `MM:SS.ms` or `HH:MM:SS.ms`
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(DomainError::InvalidRequest(format!(
                    "Time must be a non-negative number: {}",
                    time_str
                )));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds_part) = match parts.as_slice() {
            [m, s] => (0, parse_unit(m, "minutes")?, parse_seconds(s)?),
            [h, m, s] => {
                let minutes = parse_unit(m, "minutes")?;
                if minutes >= 60 {
                    return Err(DomainError::InvalidRequest(
                        "Minutes must be less than 60".to_string(),
                    ));
                }
                (parse_unit(h, "hours")?, minutes, parse_seconds(s)?)
            }
            _ => {
                return Err(DomainError::InvalidRequest(format!(
                    "Invalid time format '{}'. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)",
                    time_str
                )))
            }
        };

        Ok(Self::from_seconds(
            hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds_part,
        ))
    }

    /// Format as HH:MM:SS.ms
    pub fn format_hms(&self) -> String {
        let total_millis = (self.seconds * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let seconds = (total_millis % 60_000) / 1000;
        let milliseconds = total_millis % 1000;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

fn parse_unit(part: &str, unit: &str) -> Result<u32, DomainError> {
    part.parse::<u32>()
        .map_err(|_| DomainError::InvalidRequest(format!("Invalid {} format: {}", unit, part)))
}

fn parse_seconds(part: &str) -> Result<f64, DomainError> {
    let seconds = part
        .parse::<f64>()
        .map_err(|_| DomainError::InvalidRequest(format!("Invalid seconds format: {}", part)))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::InvalidRequest(
            "Seconds must be less than 60".to_string(),
        ));
    }
    Ok(seconds)
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Identity of one source video for progress tracking.
///
/// Kept as a structured pair so `("a_b", "c.mp4")` and `("a", "b_c.mp4")`
/// stay distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VideoIdentity {
    pub folder: String,
    pub file_name: String,
}

impl VideoIdentity {
    pub fn new(folder: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            file_name: file_name.into(),
        }
    }
}

impl fmt::Display for VideoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.folder, self.file_name)
    }
}

/// Request to trim a source video
#[derive(Debug, Clone, PartialEq)]
pub struct CutRequest {
    identity: VideoIdentity,
    start_seconds: f64,
    duration_seconds: f64,
}

impl CutRequest {
    /// Create new cut request with validation
    pub fn new(
        folder: impl Into<String>,
        file_name: impl Into<String>,
        start_seconds: f64,
        duration_seconds: f64,
    ) -> Result<Self, DomainError> {
        if !start_seconds.is_finite() || start_seconds < 0.0 {
            return Err(DomainError::InvalidRequest(format!(
                "Start must be a finite number >= 0, got {}",
                start_seconds
            )));
        }
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(DomainError::InvalidRequest(format!(
                "Duration must be a finite number > 0, got {}",
                duration_seconds
            )));
        }

        Ok(Self {
            identity: VideoIdentity::new(folder, file_name),
            start_seconds,
            duration_seconds,
        })
    }

    pub fn identity(&self) -> &VideoIdentity {
        &self.identity
    }

    pub fn folder(&self) -> &str {
        &self.identity.folder
    }

    pub fn file_name(&self) -> &str {
        &self.identity.file_name
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }
}

/// Outcome of a successful cut
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CutResult {
    /// Absolute path of the produced file
    pub output_path: PathBuf,
    /// Dated folder (`yyyy-MM-dd`) the file was written to
    pub output_folder: String,
}

/// Lifecycle of one cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CutState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl CutState {
    /// Move to `next`, rejecting transitions the lifecycle does not allow
    pub fn advance(self, next: CutState) -> Result<CutState, DomainError> {
        use CutState::*;
        match (self, next) {
            (Pending, Running) | (Pending, Failed) | (Running, Succeeded) | (Running, Failed) => {
                Ok(next)
            }
            (from, to) => Err(DomainError::InvalidRequest(format!(
                "Illegal cut state transition {:?} -> {:?}",
                from, to
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CutState::Succeeded | CutState::Failed)
    }
}

/// Exact command line for one trim
#[derive(Debug, Clone, PartialEq)]
pub struct TrimInvocation {
    pub program: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

impl TrimInvocation {
    /// Arguments in tool order: the seek must precede the input for a fast seek.
    ///
    /// Paths are passed through as-is, including names that are not valid UTF-8.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from("-ss"),
            OsString::from(self.start_seconds.to_string()),
            OsString::from("-i"),
            self.input.clone().into_os_string(),
            OsString::from("-t"),
            OsString::from(self.duration_seconds.to_string()),
            OsString::from("-c"),
            OsString::from("copy"),
            self.output.clone().into_os_string(),
        ]
    }
}

#[cfg(test)]
mod tests;
