use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

/// How many entries the ring buffer keeps.
pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct DebugEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Bounded in-memory log of recent reconcile activity, for the `/api/debug`
/// view. Owned by the workflow rather than living in ambient global state;
/// oldest entries are evicted once the buffer is full.
#[derive(Debug)]
pub struct DebugLog {
    capacity: usize,
    entries: Mutex<VecDeque<DebugEntry>>,
}

impl DebugLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn push(&self, message: impl Into<String>) {
        let entry = DebugEntry {
            at: Utc::now(),
            message: message.into(),
        };
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() == self.capacity {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    /// Snapshot of current entries, oldest first.
    pub fn entries(&self) -> Vec<DebugEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
