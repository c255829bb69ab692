// Domain rules - Naming conventions, file filters and progress estimation

use serde::Deserialize;

/// Extensions accepted as playable videos
pub const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".avi", ".mkv"];

/// Lines of tool output that count as a full run for the line-count heuristic
pub const LINES_PER_RUN: u64 = 100;

/// Highest value published while a cut is still running; 1.0 means success
pub const RUNNING_CEILING: f64 = 0.99;

/// Date format for dated cut folders
pub const CUT_FOLDER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether `file_name` names a video we list and serve
pub fn is_video_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Output file name for a cut: `cut_<stamp>_<original>`
pub fn cut_file_name(stamp_millis: i64, original_file_name: &str) -> String {
    format!("cut_{}_{}", stamp_millis, original_file_name)
}

/// How running progress is derived from the tool's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressEstimator {
    /// One hundredth per output line
    LineCount,
    /// Reported `time=` position divided by the requested duration
    #[default]
    Timestamp,
}

impl ProgressEstimator {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "line-count" | "line_count" | "lines" => Some(ProgressEstimator::LineCount),
            "timestamp" | "time" => Some(ProgressEstimator::Timestamp),
            _ => None,
        }
    }
}

/// Progress of one running cut, fed line by line.
///
/// The published value never decreases and stays at or below
/// [`RUNNING_CEILING`] until the driver declares success.
#[derive(Debug, Clone)]
pub struct CutProgress {
    estimator: ProgressEstimator,
    duration_seconds: f64,
    lines: u64,
    current: f64,
}

impl CutProgress {
    pub fn new(estimator: ProgressEstimator, duration_seconds: f64) -> Self {
        Self {
            estimator,
            duration_seconds,
            lines: 0,
            current: 0.0,
        }
    }

    /// Account for one output line and return the value to publish
    pub fn observe(&mut self, line: &str) -> f64 {
        self.lines += 1;

        let estimate = match self.estimator {
            ProgressEstimator::LineCount => self.lines as f64 / LINES_PER_RUN as f64,
            ProgressEstimator::Timestamp => match reported_position(line) {
                Some(position) if self.duration_seconds > 0.0 => {
                    position / self.duration_seconds
                }
                _ => self.current,
            },
        };

        self.current = self.current.max(estimate.clamp(0.0, RUNNING_CEILING));
        self.current
    }

    pub fn lines_seen(&self) -> u64 {
        self.lines
    }

    pub fn current(&self) -> f64 {
        self.current
    }
}

/// Extract the `time=HH:MM:SS.xx` position from a tool status line, in seconds
pub fn reported_position(line: &str) -> Option<f64> {
    let value = extract_value(line, "time=")?;
    parse_clock(&value)
}

/// Value following `key` up to the next whitespace, skipping leading padding
pub fn extract_value(line: &str, key: &str) -> Option<String> {
    let start = line.find(key)?;
    let after_key = &line[start + key.len()..];
    let value_part = after_key.trim_start();
    let end = value_part
        .find(char::is_whitespace)
        .unwrap_or(value_part.len());
    let value = &value_part[..end];
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_clock(value: &str) -> Option<f64> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let mut seconds = 0.0;
    for part in digits.split(':') {
        let parsed = part.parse::<f64>().ok()?;
        seconds = seconds * 60.0 + parsed;
    }

    // Negative positions appear before the first packet is muxed.
    if negative {
        Some(0.0)
    } else {
        Some(seconds)
    }
}
