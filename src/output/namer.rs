//! Dated cut folders and collision-free output names

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::rules::{cut_file_name, CUT_FOLDER_DATE_FORMAT};

/// Destination chosen for one cut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSlot {
    /// `yyyy-MM-dd` folder name
    pub folder: String,
    /// Absolute path the tool writes to
    pub path: PathBuf,
}

/// Issues output paths under `<cuts_root>/<yyyy-MM-dd>/`.
///
/// Stamps are epoch milliseconds, strictly increasing per namer, so two cuts
/// issued by the same namer never share a name even within one millisecond.
/// Stamps whose file already exists on disk are skipped.
#[derive(Debug)]
pub struct OutputNamer {
    cuts_root: PathBuf,
    last_stamp: AtomicI64,
}

impl OutputNamer {
    pub fn new(cuts_root: impl Into<PathBuf>) -> Self {
        Self {
            cuts_root: cuts_root.into(),
            last_stamp: AtomicI64::new(0),
        }
    }

    /// Create the dated folder for `now` if needed and reserve a name for `original_file_name`
    pub fn reserve<Tz>(
        &self,
        now: &DateTime<Tz>,
        original_file_name: &str,
    ) -> Result<OutputSlot, DomainError>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let folder = now.format(CUT_FOLDER_DATE_FORMAT).to_string();
        let dir = self.ensure_folder(&folder)?;

        loop {
            let stamp = self.next_stamp(now.timestamp_millis());
            let path = dir.join(cut_file_name(stamp, original_file_name));
            if !path.exists() {
                debug!(path = %path.display(), "reserved cut output");
                return Ok(OutputSlot { folder, path });
            }
        }
    }

    /// Idempotent: a folder created concurrently by another cut is fine
    pub fn ensure_folder(&self, folder: &str) -> Result<PathBuf, DomainError> {
        let dir = self.cuts_root.join(folder);
        std::fs::create_dir_all(&dir).map_err(|e| DomainError::io(&dir, e))?;
        dir.canonicalize().map_err(|e| DomainError::io(&dir, e))
    }

    fn next_stamp(&self, now_millis: i64) -> i64 {
        let mut current = self.last_stamp.load(Ordering::Relaxed);
        loop {
            let next = now_millis.max(current + 1);
            match self.last_stamp.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }
}
