use std::sync::Arc;

use vocab_core::model::{ProgressRecord, WordId};

use crate::repository::{
    LoadStatus, PersistStatus, PROGRESS_KEY, SnapshotRepository, load_json, save_json,
};

/// Owns the cumulative `ProgressRecord` and its snapshot.
pub struct ProgressStore {
    repo: Arc<dyn SnapshotRepository>,
    record: ProgressRecord,
}

impl ProgressStore {
    /// Initialize from the persisted snapshot, or zeros if absent/unreadable.
    #[must_use]
    pub fn load(repo: Arc<dyn SnapshotRepository>) -> (Self, LoadStatus) {
        let (record, status) = load_json(repo.as_ref(), PROGRESS_KEY);
        (Self { repo, record }, status)
    }

    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    /// Count one finished item; correct answers also bump the global and
    /// per-word counters. Persists once.
    pub fn record_answer(&mut self, id: WordId, correct: bool) -> PersistStatus {
        self.record.record_seen();
        if correct {
            self.record.record_correct(id);
        }
        self.flush()
    }

    /// Zero every counter and persist.
    pub fn reset(&mut self) -> PersistStatus {
        log::info!(
            "resetting progress ({} correct answers recorded)",
            self.record.total_correct()
        );
        self.record.reset();
        self.flush()
    }

    pub fn flush(&self) -> PersistStatus {
        PersistStatus::from_result(
            PROGRESS_KEY,
            save_json(self.repo.as_ref(), PROGRESS_KEY, &self.record),
        )
    }
}
