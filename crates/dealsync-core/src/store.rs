use crate::io::atomic_write;
use crate::record::ProjectRecord;
use std::path::{Path, PathBuf};

/// Flat-file store of created projects: a single JSON document holding an
/// ordered array of records, rewritten in full on every append.
///
/// Both `load` and `save` fail soft. A corrupt or unreadable file yields an
/// empty list and a failed write is logged, never raised — availability of
/// the reconcile loop wins over durability of past records here.
///
/// There is no file lock: a second *process* appending concurrently can
/// still drop writes (last snapshot wins). In-process, the server routes all
/// appends through a single worker task, which is what actually serializes
/// read-modify-write.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records. Missing file, unreadable file, and unparseable
    /// content all yield an empty list.
    pub fn load(&self) -> Vec<ProjectRecord> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read project store");
                return Vec::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "project store is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Rewrite the whole snapshot. Write errors are logged, not surfaced.
    pub fn save(&self, records: &[ProjectRecord]) {
        let data = match serde_json::to_vec_pretty(records) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize project store");
                return;
            }
        };
        if let Err(e) = atomic_write(&self.path, &data) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write project store");
        }
    }

    /// Load, push, save. Not atomic as a unit.
    pub fn append(&self, record: ProjectRecord) {
        let mut records = self.load();
        records.push(record);
        self.save(&records);
    }

    pub fn contains_deal(&self, deal_id: &str) -> bool {
        self.load().iter().any(|r| r.deal_id == deal_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
