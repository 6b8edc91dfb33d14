use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use storage::{PersistStatus, ProgressStore, WordStore};
use vocab_core::matcher::{AcceptedAnswers, Outcome, check_choice};
use vocab_core::model::{LevelFilter, QuizMode, TrainerSettings, WordEntry, WordId};

use super::progress::{SessionPhase, SessionProgress};
use super::prompt::{Prompt, PromptKind};
use crate::error::SessionError;
use crate::pool::{Pool, PoolBuilder};

//
// ─── INPUTS AND RESULTS ────────────────────────────────────────────────────────
//

/// A graded answer for the current item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Index into the presented multiple-choice options.
    Choice(usize),
    /// Free text for typed sessions.
    Typed(String),
}

impl Answer {
    fn kind(&self) -> &'static str {
        match self {
            Self::Choice(_) => "choice",
            Self::Typed(_) => "typed",
        }
    }
}

/// Flashcard self-assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfGrade {
    /// Counts as correct.
    KnewIt,
    /// Advances without scoring.
    NeedsPractice,
}

/// Result of `present_current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Item(Prompt),
    Finished(SessionProgress),
}

/// The hidden side of the current item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub answer: String,
    pub plural: Option<String>,
}

/// Outcome of answering (or skipping) one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub word: WordId,
    /// `None` for an ungraded flashcard skip.
    pub outcome: Option<Outcome>,
    /// Answers that would have been accepted, for feedback on a miss.
    pub expected: Vec<String>,
    pub plural: Option<String>,
    /// Progress after advancing past the item.
    pub progress: SessionProgress,
    pub persist: PersistStatus,
}

impl Evaluation {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.outcome.is_some_and(Outcome::is_correct)
    }
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Quiz state machine over one pool: `Idle` → `Active` → `Finished`.
///
/// Owns neither store; callers pass `WordStore` and `ProgressStore` into the
/// operations that read or update them.
pub struct SessionEngine {
    rng: StdRng,
    choice_count: usize,
    distractor_attempts: u32,
    pool: Pool,
    mode: Option<QuizMode>,
    position: usize,
    session_correct: usize,
    phase: SessionPhase,
    presented: Option<Prompt>,
}

impl SessionEngine {
    /// Engine seeded from the thread-local generator.
    #[must_use]
    pub fn new(settings: &TrainerSettings) -> Self {
        Self::with_rng(settings, StdRng::from_rng(&mut rand::rng()))
    }

    /// Engine with an injected generator; tests pass a seeded `StdRng`.
    #[must_use]
    pub fn with_rng(settings: &TrainerSettings, rng: StdRng) -> Self {
        Self {
            rng,
            choice_count: settings.choice_count(),
            distractor_attempts: settings.distractor_attempts(),
            pool: Pool::default(),
            mode: None,
            position: 0,
            session_correct: 0,
            phase: SessionPhase::Idle,
            presented: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> Option<QuizMode> {
        self.mode
    }

    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// The item at the cursor while `Active`.
    #[must_use]
    pub fn current(&self) -> Option<&WordEntry> {
        match self.phase {
            SessionPhase::Active => self.pool.get(self.position),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            phase: self.phase,
            mode: self.mode,
            position: self.position,
            total: self.pool.len(),
            session_correct: self.session_correct,
        }
    }

    //
    // ─── POOL CONTROL ──────────────────────────────────────────────────────────
    //

    /// Rebuild the pool from `filter`, shuffle it and begin at the first item.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` (leaving the engine `Idle`) when no
    /// stored word matches the filter.
    pub fn start(
        &mut self,
        mode: QuizMode,
        filter: &LevelFilter,
        words: &WordStore,
    ) -> Result<SessionProgress, SessionError> {
        self.mode = Some(mode);
        self.pool = PoolBuilder::new(words).build_shuffled(filter, &mut self.rng);
        self.reset_cursor();

        if self.pool.is_empty() {
            self.phase = SessionPhase::Idle;
            log::debug!("refusing to start {mode} session: no words for level {filter}");
            return Err(SessionError::EmptyPool);
        }

        self.phase = SessionPhase::Active;
        log::debug!(
            "started {mode} session over {} words (level {filter})",
            self.pool.len()
        );
        Ok(self.progress())
    }

    /// Replace the pool with the unshuffled entries matching `filter` and
    /// reset the cursor. Stays `Idle` until a mode has been chosen.
    pub fn rebuild(&mut self, filter: &LevelFilter, words: &WordStore) -> SessionProgress {
        self.pool = PoolBuilder::new(words).build(filter);
        self.reset_cursor();
        self.phase = if self.mode.is_some() && !self.pool.is_empty() {
            SessionPhase::Active
        } else {
            SessionPhase::Idle
        };
        log::debug!("rebuilt pool for level {filter}: {} words", self.pool.len());
        self.progress()
    }

    /// Shuffle the current pool again and restart from its first item.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when there is nothing to shuffle.
    pub fn shuffle(&mut self) -> Result<SessionProgress, SessionError> {
        if self.pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }
        self.pool.shuffle(&mut self.rng);
        self.reset_cursor();
        if self.mode.is_some() {
            self.phase = SessionPhase::Active;
        }
        Ok(self.progress())
    }

    /// Replay the finished pool in the same order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` while items remain and
    /// `SessionError::NotStarted` when idle.
    pub fn restart(&mut self) -> Result<SessionProgress, SessionError> {
        match self.phase {
            SessionPhase::Finished => {}
            SessionPhase::Active => return Err(SessionError::NotFinished),
            SessionPhase::Idle => return Err(SessionError::NotStarted),
        }
        self.reset_cursor();
        self.phase = SessionPhase::Active;
        log::debug!("restarted session over {} words", self.pool.len());
        Ok(self.progress())
    }

    /// Drop the pool and return to `Idle`, keeping the chosen mode.
    pub fn clear(&mut self) {
        self.pool = Pool::default();
        self.reset_cursor();
        self.phase = SessionPhase::Idle;
    }

    /// Zero the session score without moving the cursor.
    pub fn reset_score(&mut self) {
        self.session_correct = 0;
    }

    fn reset_cursor(&mut self) {
        self.position = 0;
        self.session_correct = 0;
        self.presented = None;
    }

    //
    // ─── PER ITEM ──────────────────────────────────────────────────────────────
    //

    /// Prompt for the current item, or the completion signal once finished.
    ///
    /// The prompt is built once per position; asking again returns the same
    /// prompt (including multiple-choice order) until the item is answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` or `SessionError::NotStarted` while idle.
    pub fn present_current(&mut self, words: &WordStore) -> Result<Presentation, SessionError> {
        match self.phase {
            SessionPhase::Idle if self.pool.is_empty() => return Err(SessionError::EmptyPool),
            SessionPhase::Idle => return Err(SessionError::NotStarted),
            SessionPhase::Finished => return Ok(Presentation::Finished(self.progress())),
            SessionPhase::Active => {}
        }
        let mode = self.mode.ok_or(SessionError::NotStarted)?;

        if let Some(prompt) = self
            .presented
            .as_ref()
            .filter(|p| p.position == self.position)
        {
            return Ok(Presentation::Item(prompt.clone()));
        }

        let item = self.pool.get(self.position).ok_or(SessionError::Completed)?;
        let prompt = Prompt {
            word: item.id(),
            position: self.position,
            kind: PromptKind::build(
                mode,
                item,
                words.all(),
                self.choice_count,
                self.distractor_attempts,
                &mut self.rng,
            ),
        };
        self.presented = Some(prompt.clone());
        Ok(Presentation::Item(prompt))
    }

    /// Hidden side of the current item, without grading it.
    ///
    /// # Errors
    ///
    /// Fails outside an active session and for multiple-choice sessions.
    pub fn reveal(&self) -> Result<Reveal, SessionError> {
        let (mode, item) = self.active_item()?;
        let answer = match mode {
            QuizMode::Flashcard => item.translation().to_owned(),
            QuizMode::Typed => item.headword_form(),
            QuizMode::MultipleChoice => return Err(SessionError::NothingToReveal(mode)),
        };
        Ok(Reveal {
            answer,
            plural: item.plural_opt().map(str::to_owned),
        })
    }

    /// Grade a multiple-choice or typed answer and advance by one item.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` when no item is active, the answer kind does
    /// not fit the mode, or a choice is made without a live presentation.
    pub fn evaluate(
        &mut self,
        answer: Answer,
        words: &WordStore,
        progress: &mut ProgressStore,
    ) -> Result<Evaluation, SessionError> {
        let (mode, item) = self.active_item()?;
        let word = item.id();
        let plural = item.plural_opt().map(str::to_owned);
        let (outcome, expected) = match (mode, &answer) {
            (QuizMode::MultipleChoice, Answer::Choice(index)) => {
                let choices = match self.presented.as_ref().map(|p| (p.position, &p.kind)) {
                    Some((position, PromptKind::MultipleChoice { choices, .. }))
                        if position == self.position =>
                    {
                        choices
                    }
                    _ => return Err(SessionError::NotPresented),
                };
                let selected = choices.get(*index).ok_or(SessionError::InvalidChoice {
                    index: *index,
                    len: choices.len(),
                })?;
                (
                    check_choice(selected, item),
                    vec![item.translation().to_owned()],
                )
            }
            (QuizMode::Typed, Answer::Typed(text)) => {
                let accepted = AcceptedAnswers::collect(item, words.all());
                (accepted.check(text), accepted.forms().to_vec())
            }
            _ => {
                return Err(SessionError::ModeMismatch {
                    mode,
                    answer: answer.kind(),
                });
            }
        };

        Ok(self.advance(word, plural, Some(outcome), expected, progress))
    }

    /// Record a flashcard self-assessment and advance by one item.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` when no item is active or the session is not
    /// a flashcard session.
    pub fn self_grade(
        &mut self,
        grade: SelfGrade,
        progress: &mut ProgressStore,
    ) -> Result<Evaluation, SessionError> {
        let (mode, item) = self.active_item()?;
        if mode != QuizMode::Flashcard {
            return Err(SessionError::ModeMismatch {
                mode,
                answer: "self-graded",
            });
        }
        let outcome = match grade {
            SelfGrade::KnewIt => Some(Outcome::Correct),
            SelfGrade::NeedsPractice => None,
        };
        let word = item.id();
        let plural = item.plural_opt().map(str::to_owned);
        let expected = vec![item.translation().to_owned()];
        Ok(self.advance(word, plural, outcome, expected, progress))
    }

    fn active_item(&self) -> Result<(QuizMode, &WordEntry), SessionError> {
        match self.phase {
            SessionPhase::Idle => Err(SessionError::NotStarted),
            SessionPhase::Finished => Err(SessionError::Completed),
            SessionPhase::Active => {
                let mode = self.mode.ok_or(SessionError::NotStarted)?;
                let item = self.pool.get(self.position).ok_or(SessionError::Completed)?;
                Ok((mode, item))
            }
        }
    }

    fn advance(
        &mut self,
        word: WordId,
        plural: Option<String>,
        outcome: Option<Outcome>,
        expected: Vec<String>,
        progress: &mut ProgressStore,
    ) -> Evaluation {
        let correct = outcome.is_some_and(Outcome::is_correct);
        if correct {
            self.session_correct += 1;
        }
        let persist = progress.record_answer(word, correct);

        self.position += 1;
        self.presented = None;
        if self.position >= self.pool.len() {
            self.phase = SessionPhase::Finished;
            log::debug!(
                "session finished: {}/{} correct",
                self.session_correct,
                self.pool.len()
            );
        }

        Evaluation {
            word,
            outcome,
            expected,
            plural,
            progress: self.progress(),
            persist,
        }
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("mode", &self.mode)
            .field("phase", &self.phase)
            .field("pool_len", &self.pool.len())
            .field("position", &self.position)
            .field("session_correct", &self.session_correct)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
