use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vocab_core::model::{LevelFilter, WordEntry, WordError, WordId, WordRow};

use crate::repository::{
    LoadStatus, PersistStatus, SnapshotRepository, StorageError, WORDS_KEY, load_json, save_json,
};

/// Persisted shape of a word entry.
///
/// Keeps the import column names so a snapshot reads like the CSV it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: WordId,
    #[serde(rename = "Level", default)]
    pub level: String,
    #[serde(rename = "Article", default)]
    pub article: String,
    #[serde(rename = "German")]
    pub german: String,
    #[serde(rename = "Plural", default)]
    pub plural: String,
    #[serde(rename = "English")]
    pub english: String,
}

impl WordRecord {
    #[must_use]
    pub fn from_entry(entry: &WordEntry) -> Self {
        Self {
            id: entry.id(),
            level: entry.level().to_owned(),
            article: entry.article().to_owned(),
            german: entry.headword().to_owned(),
            plural: entry.plural().to_owned(),
            english: entry.translation().to_owned(),
        }
    }

    /// Convert the record back into a domain `WordEntry`.
    ///
    /// # Errors
    ///
    /// Returns `WordError` if the stored headword or translation is blank.
    pub fn into_entry(self) -> Result<WordEntry, WordError> {
        WordEntry::from_persisted(
            self.id,
            self.level,
            self.article,
            self.german,
            self.plural,
            self.english,
        )
    }
}

/// Result of appending a batch of candidate rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub accepted: usize,
    pub rejected: usize,
    pub persist: PersistStatus,
}

/// The full imported vocabulary, in insertion order.
pub struct WordStore {
    repo: Arc<dyn SnapshotRepository>,
    words: Vec<WordEntry>,
}

impl WordStore {
    /// Initialize from the persisted snapshot, or empty if there is none.
    ///
    /// Individual records that fail validation are skipped with a warning; a
    /// snapshot that cannot be parsed at all yields an empty store.
    #[must_use]
    pub fn load(repo: Arc<dyn SnapshotRepository>) -> (Self, LoadStatus) {
        let (records, status): (Vec<WordRecord>, _) = load_json(repo.as_ref(), WORDS_KEY);
        let mut words = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id;
            match record.into_entry() {
                Ok(entry) => words.push(entry),
                Err(err) => log::warn!("skipping stored word {id}: {err}"),
            }
        }
        log::debug!("word store loaded {} entries ({status:?})", words.len());
        (Self { repo, words }, status)
    }

    /// Validate and append `rows` in order, each with a fresh id.
    ///
    /// Rows without headword or translation are dropped and only counted.
    /// Persists once after the batch.
    pub fn import_rows(
        &mut self,
        rows: impl IntoIterator<Item = WordRow>,
        fallback_level: &str,
    ) -> ImportOutcome {
        let mut accepted = 0;
        let mut rejected = 0;
        for row in rows {
            match WordEntry::from_row(row, fallback_level, WordId::generate()) {
                Ok(entry) => {
                    self.words.push(entry);
                    accepted += 1;
                }
                Err(_) => rejected += 1,
            }
        }
        log::info!("imported {accepted} words ({rejected} rejected)");
        ImportOutcome {
            accepted,
            rejected,
            persist: self.flush(),
        }
    }

    /// Remove every entry and persist the empty collection.
    pub fn clear(&mut self) -> PersistStatus {
        log::info!("clearing {} words", self.words.len());
        self.words.clear();
        self.flush()
    }

    /// Entries matching the level filter and, when `text` is non-blank, whose
    /// `"<headword> <translation>"` contains it case-insensitively.
    #[must_use]
    pub fn query(&self, level: &LevelFilter, text: &str) -> Vec<&WordEntry> {
        let needle = text.trim().to_lowercase();
        self.words
            .iter()
            .filter(|w| level.matches(w.level()))
            .filter(|w| {
                needle.is_empty()
                    || format!("{} {}", w.headword(), w.translation())
                        .to_lowercase()
                        .contains(&needle)
            })
            .collect()
    }

    #[must_use]
    pub fn all(&self) -> &[WordEntry] {
        &self.words
    }

    #[must_use]
    pub fn get(&self, id: WordId) -> Option<&WordEntry> {
        self.words.iter().find(|w| w.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Entry count per level tag.
    #[must_use]
    pub fn level_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for word in &self.words {
            *counts.entry(word.level().to_owned()).or_insert(0) += 1;
        }
        counts
    }

    /// Best-effort write of the current collection.
    pub fn flush(&self) -> PersistStatus {
        let records: Vec<WordRecord> = self.words.iter().map(WordRecord::from_entry).collect();
        PersistStatus::from_result(WORDS_KEY, self.save(&records))
    }

    fn save(&self, records: &[WordRecord]) -> Result<(), StorageError> {
        save_json(self.repo.as_ref(), WORDS_KEY, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    fn rows() -> Vec<WordRow> {
        vec![
            WordRow::new("a1", "der", "Hund", "Hunde", "dog"),
            WordRow::new("", "", "", "", "nothing"),
            WordRow::new("A2", "die", "Katze", "Katzen", "cat"),
            WordRow::new("B1", "", "laufen", "", ""),
            WordRow::new("", "das", "Haus", "Häuser", "house"),
        ]
    }

    fn new_store() -> (WordStore, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        let (store, status) = WordStore::load(Arc::new(repo.clone()));
        assert_eq!(status, LoadStatus::Missing);
        (store, repo)
    }

    #[test]
    fn import_keeps_valid_rows_in_order() {
        let (mut store, _) = new_store();
        let outcome = store.import_rows(rows(), "others");

        assert_eq!(outcome.accepted, 3);
        assert_eq!(outcome.rejected, 2);
        assert!(outcome.persist.is_saved());

        let heads: Vec<_> = store.all().iter().map(WordEntry::headword).collect();
        assert_eq!(heads, ["Hund", "Katze", "Haus"]);
        assert_eq!(store.all()[0].level(), "A1");
        assert_eq!(store.all()[2].level(), "OTHERS");

        let ids: std::collections::HashSet<_> = store.all().iter().map(WordEntry::id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn import_appends_after_existing_entries() {
        let (mut store, _) = new_store();
        let _ = store.import_rows(vec![WordRow::new("A1", "der", "Hund", "", "dog")], "A1");
        let first_id = store.all()[0].id();
        let _ = store.import_rows(vec![WordRow::new("A1", "die", "Maus", "", "mouse")], "A1");
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].id(), first_id);
        assert_eq!(store.all()[1].headword(), "Maus");
    }

    #[test]
    fn query_filters_by_level_and_text() {
        let (mut store, _) = new_store();
        let _ = store.import_rows(rows(), "OTHERS");

        let a1 = store.query(&LevelFilter::parse("a1"), "");
        assert_eq!(a1.len(), 1);
        assert_eq!(a1[0].headword(), "Hund");

        let cat = store.query(&LevelFilter::All, "CAT");
        assert_eq!(cat.len(), 1);
        assert_eq!(cat[0].headword(), "Katze");

        let across = store.query(&LevelFilter::All, "hund dog");
        assert_eq!(across.len(), 1);

        assert!(store.query(&LevelFilter::parse("A2"), "dog").is_empty());
        assert_eq!(store.query(&LevelFilter::All, "  ").len(), 3);
    }

    #[test]
    fn snapshot_survives_reload() {
        let (mut store, repo) = new_store();
        let _ = store.import_rows(rows(), "OTHERS");
        let ids: Vec<_> = store.all().iter().map(WordEntry::id).collect();

        let (reloaded, status) = WordStore::load(Arc::new(repo));
        assert_eq!(status, LoadStatus::Loaded);
        let reloaded_ids: Vec<_> = reloaded.all().iter().map(WordEntry::id).collect();
        assert_eq!(reloaded_ids, ids);
        assert_eq!(reloaded.all(), store.all());
    }

    #[test]
    fn clear_empties_and_persists() {
        let (mut store, repo) = new_store();
        let _ = store.import_rows(rows(), "OTHERS");
        assert!(store.clear().is_saved());
        assert!(store.is_empty());

        let (reloaded, _) = WordStore::load(Arc::new(repo));
        assert!(reloaded.is_empty());
    }

    #[test]
    fn failed_write_keeps_memory_state() {
        let (mut store, repo) = new_store();
        repo.set_reject_writes(true);
        let outcome = store.import_rows(rows(), "OTHERS");
        assert_eq!(outcome.accepted, 3);
        assert!(outcome.persist.warning().is_some());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn malformed_snapshot_starts_empty() {
        let repo = InMemoryRepository::new();
        repo.save(WORDS_KEY, r#"{"oops": true}"#).unwrap();
        let (store, status) = WordStore::load(Arc::new(repo));
        assert!(store.is_empty());
        assert!(matches!(status, LoadStatus::Malformed(_)));
    }

    #[test]
    fn invalid_stored_record_is_skipped() {
        let repo = InMemoryRepository::new();
        let good = WordId::generate();
        let bad = WordId::generate();
        let raw = format!(
            r#"[{{"id":"{good}","Level":"A1","German":"Hund","English":"dog"}},
                {{"id":"{bad}","Level":"A1","German":"","English":"ghost"}}]"#
        );
        repo.save(WORDS_KEY, &raw).unwrap();
        let (store, status) = WordStore::load(Arc::new(repo));
        assert_eq!(status, LoadStatus::Loaded);
        assert_eq!(store.len(), 1);
        assert!(store.get(good).is_some());
        assert!(store.get(bad).is_none());
    }

    #[test]
    fn level_counts_group_entries() {
        let (mut store, _) = new_store();
        let _ = store.import_rows(rows(), "OTHERS");
        let counts = store.level_counts();
        assert_eq!(counts.get("A1"), Some(&1));
        assert_eq!(counts.get("OTHERS"), Some(&1));
    }
}
