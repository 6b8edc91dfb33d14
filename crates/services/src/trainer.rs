use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;

use storage::{
    LoadStatus, PersistStatus, ProgressStore, SnapshotRepository, StorageError, WordStore,
};
use vocab_core::model::{
    LevelAssignment, LevelFilter, ProgressRecord, QuizMode, TrainerSettings, WordRow,
};

use crate::error::{ImportError, SessionError};
use crate::import::{self, FileReport, FileStatus, ImportReport, ParsedCsv};
use crate::revision::{RevisionPage, RevisionQuery, revision_page};
use crate::sessions::{
    Answer, Evaluation, Presentation, Reveal, SelfGrade, SessionEngine, SessionProgress,
};
use crate::settings_service::SettingsService;

/// Totals shown on the stats panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerStats {
    pub words: usize,
    pub total_correct: u64,
    pub total_seen: u64,
    /// Distinct words answered correctly at least once.
    pub words_answered: usize,
    pub per_level: BTreeMap<String, usize>,
}

/// Owns the stores and the session engine for one learner.
///
/// Every operation runs to completion before returning; persistence happens
/// inside the operation that changed the data.
pub struct Trainer {
    settings: TrainerSettings,
    words: WordStore,
    progress: ProgressStore,
    engine: SessionEngine,
    filter: LevelFilter,
    load_warnings: Vec<StorageError>,
}

impl Trainer {
    /// Load settings, words and progress from `repo`.
    ///
    /// Missing or unreadable snapshots start empty; see `load_warnings`.
    #[must_use]
    pub fn open(repo: Arc<dyn SnapshotRepository>) -> Self {
        let settings = SettingsService::new(Arc::clone(&repo)).load().0;
        let engine = SessionEngine::new(&settings);
        Self::assemble(repo, settings, engine)
    }

    /// Like `open`, with a seeded generator for reproducible sessions.
    #[must_use]
    pub fn open_with_rng(repo: Arc<dyn SnapshotRepository>, rng: StdRng) -> Self {
        let settings = SettingsService::new(Arc::clone(&repo)).load().0;
        let engine = SessionEngine::with_rng(&settings, rng);
        Self::assemble(repo, settings, engine)
    }

    fn assemble(
        repo: Arc<dyn SnapshotRepository>,
        settings: TrainerSettings,
        engine: SessionEngine,
    ) -> Self {
        let (words, words_status) = WordStore::load(Arc::clone(&repo));
        let (progress, progress_status) = ProgressStore::load(repo);
        let load_warnings = [words_status, progress_status]
            .iter()
            .filter_map(LoadStatus::warning)
            .cloned()
            .collect();

        let mut trainer = Self {
            settings,
            words,
            progress,
            engine,
            filter: LevelFilter::All,
            load_warnings,
        };
        trainer.engine.rebuild(&trainer.filter, &trainer.words);
        trainer
    }

    #[must_use]
    pub fn settings(&self) -> &TrainerSettings {
        &self.settings
    }

    #[must_use]
    pub fn words(&self) -> &WordStore {
        &self.words
    }

    #[must_use]
    pub fn progress_record(&self) -> &ProgressRecord {
        self.progress.record()
    }

    #[must_use]
    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    #[must_use]
    pub fn filter(&self) -> &LevelFilter {
        &self.filter
    }

    /// Storage problems met while opening.
    #[must_use]
    pub fn load_warnings(&self) -> &[StorageError] {
        &self.load_warnings
    }

    //
    // ─── SESSION ───────────────────────────────────────────────────────────────
    //

    /// Change the level filter and rebuild the pool from it.
    pub fn set_filter(&mut self, filter: LevelFilter) -> SessionProgress {
        self.filter = filter;
        self.engine.rebuild(&self.filter, &self.words)
    }

    /// Start a shuffled session over the current filter.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` if no word matches the filter.
    pub fn start(&mut self, mode: QuizMode) -> Result<SessionProgress, SessionError> {
        self.engine.start(mode, &self.filter, &self.words)
    }

    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` if the pool is empty.
    pub fn shuffle(&mut self) -> Result<SessionProgress, SessionError> {
        self.engine.shuffle()
    }

    /// # Errors
    ///
    /// Returns a `SessionError` unless the session is finished.
    pub fn restart(&mut self) -> Result<SessionProgress, SessionError> {
        self.engine.restart()
    }

    /// # Errors
    ///
    /// Returns a `SessionError` while idle.
    pub fn present(&mut self) -> Result<Presentation, SessionError> {
        self.engine.present_current(&self.words)
    }

    /// # Errors
    ///
    /// Returns a `SessionError` outside an active flashcard or typed session.
    pub fn reveal(&self) -> Result<Reveal, SessionError> {
        self.engine.reveal()
    }

    /// # Errors
    ///
    /// See `SessionEngine::evaluate`.
    pub fn answer(&mut self, answer: Answer) -> Result<Evaluation, SessionError> {
        self.engine.evaluate(answer, &self.words, &mut self.progress)
    }

    /// # Errors
    ///
    /// See `SessionEngine::self_grade`.
    pub fn self_grade(&mut self, grade: SelfGrade) -> Result<Evaluation, SessionError> {
        self.engine.self_grade(grade, &mut self.progress)
    }

    //
    // ─── VOCABULARY ────────────────────────────────────────────────────────────
    //

    /// Append already-parsed rows; rows without a level get `fallback_level`
    /// (or the configured fallback). Rebuilds the pool afterwards.
    pub fn import_rows(
        &mut self,
        rows: Vec<WordRow>,
        fallback_level: Option<&str>,
    ) -> ImportReport {
        let fallback = fallback_level
            .unwrap_or(self.settings.fallback_level())
            .to_owned();
        let outcome = self.words.import_rows(rows, &fallback);
        let mut report = ImportReport {
            accepted: outcome.accepted,
            rejected: outcome.rejected,
            ..ImportReport::default()
        };
        report.record_persist(outcome.persist);
        self.engine.rebuild(&self.filter, &self.words);
        report
    }

    /// Parse and append CSV text that came from `file_name`.
    ///
    /// # Errors
    ///
    /// Returns `ImportError` if the text is not valid CSV; nothing is stored then.
    pub fn import_csv(
        &mut self,
        file_name: &str,
        text: &str,
        assignment: &LevelAssignment,
    ) -> Result<ImportReport, ImportError> {
        let parsed = import::parse_csv(text)?;
        let mut report = ImportReport::default();
        self.append_parsed(file_name, parsed, assignment, &mut report);
        self.engine.rebuild(&self.filter, &self.words);
        Ok(report)
    }

    /// Import several CSV files; a file that fails is reported and skipped.
    pub fn import_files<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        assignment: &LevelAssignment,
    ) -> ImportReport {
        let mut report = ImportReport::default();
        for path in paths {
            let path = path.as_ref();
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            match import::read_csv_file(path) {
                Ok(parsed) => self.append_parsed(&file_name, parsed, assignment, &mut report),
                Err(err) => {
                    log::warn!("skipping {file_name}: {err}");
                    report.files.push(FileReport {
                        file: file_name,
                        status: FileStatus::Failed(err.to_string()),
                    });
                }
            }
        }
        log::info!(
            "imported {} rows from {} file(s)",
            report.accepted,
            paths.len()
        );
        self.engine.rebuild(&self.filter, &self.words);
        report
    }

    fn append_parsed(
        &mut self,
        file_name: &str,
        parsed: ParsedCsv,
        assignment: &LevelAssignment,
        report: &mut ImportReport,
    ) {
        let level = assignment.resolve(file_name, self.settings.fallback_level());
        let outcome = self.words.import_rows(parsed.rows, &level);
        let rejected = outcome.rejected + parsed.skipped;

        report.accepted += outcome.accepted;
        report.rejected += rejected;
        report.record_persist(outcome.persist);
        report.files.push(FileReport {
            file: file_name.to_owned(),
            status: FileStatus::Imported {
                level,
                accepted: outcome.accepted,
                rejected,
            },
        });
    }

    /// The whole store as CSV.
    ///
    /// # Errors
    ///
    /// Returns `ImportError` if serialization fails.
    pub fn export_csv(&self) -> Result<String, ImportError> {
        import::export_csv(self.words.all())
    }

    /// Remove every word and drop back to an idle, empty session.
    pub fn clear_words(&mut self) -> PersistStatus {
        let status = self.words.clear();
        self.engine.clear();
        status
    }

    /// Zero the stored progress and the running session's score.
    pub fn reset_progress(&mut self) -> PersistStatus {
        self.engine.reset_score();
        self.progress.reset()
    }

    //
    // ─── VIEWS ─────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn revision(&self, query: &RevisionQuery) -> RevisionPage {
        revision_page(&self.words, query, self.settings.page_size())
    }

    #[must_use]
    pub fn stats(&self) -> TrainerStats {
        let record = self.progress.record();
        TrainerStats {
            words: self.words.len(),
            total_correct: record.total_correct(),
            total_seen: record.total_seen(),
            words_answered: record.words_answered(),
            per_level: self.words.level_counts(),
        }
    }
}
