use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::WordId;

/// Cumulative answer counts across all sessions.
///
/// `per_word` only holds words answered correctly at least once. Counts only
/// grow, except through [`ProgressRecord::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    total_correct: u64,
    #[serde(default)]
    total_seen: u64,
    #[serde(default)]
    per_word: HashMap<WordId, u64>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn total_correct(&self) -> u64 {
        self.total_correct
    }

    #[must_use]
    pub fn total_seen(&self) -> u64 {
        self.total_seen
    }

    /// Correct answers recorded for one word (0 if never answered correctly).
    #[must_use]
    pub fn correct_for(&self, id: WordId) -> u64 {
        self.per_word.get(&id).copied().unwrap_or(0)
    }

    /// Number of distinct words answered correctly at least once.
    #[must_use]
    pub fn words_answered(&self) -> usize {
        self.per_word.len()
    }

    pub fn record_correct(&mut self, id: WordId) {
        self.total_correct = self.total_correct.saturating_add(1);
        let count = self.per_word.entry(id).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn record_seen(&mut self) {
        self.total_seen = self.total_seen.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
