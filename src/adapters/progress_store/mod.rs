// Progress store adapter - Sharded concurrent map of cut progress

use dashmap::DashMap;

use crate::domain::model::VideoIdentity;
use crate::ports::ProgressPort;

/// In-memory progress store owned by one orchestrator instance
#[derive(Debug, Default)]
pub struct ProgressStore {
    entries: DashMap<VideoIdentity, f64>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl ProgressPort for ProgressStore {
    fn set(&self, identity: &VideoIdentity, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.entries.insert(identity.clone(), value);
    }

    fn get(&self, identity: &VideoIdentity) -> f64 {
        self.entries.get(identity).map(|entry| *entry).unwrap_or(0.0)
    }

    fn snapshot(&self) -> Vec<(VideoIdentity, f64)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
