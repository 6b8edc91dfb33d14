use rand::Rng;
use rand::seq::SliceRandom;

use vocab_core::model::{QuizMode, WordEntry, WordId};

//
// ─── PROMPTS ───────────────────────────────────────────────────────────────────
//

/// What the learner sees for one pool position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub word: WordId,
    pub position: usize,
    pub kind: PromptKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Headword form on the front; the meaning stays hidden until revealed.
    Flashcard { front: String },
    /// Headword form plus translation options.
    MultipleChoice { question: String, choices: ChoiceSet },
    /// The meaning; the learner types the headword form.
    Typed { meaning: String },
}

impl PromptKind {
    /// Build the mode-specific prompt for `item`.
    ///
    /// Only multiple choice consults `all_words` and the rng.
    pub fn build<R: Rng + ?Sized>(
        mode: QuizMode,
        item: &WordEntry,
        all_words: &[WordEntry],
        choice_count: usize,
        max_attempts: u32,
        rng: &mut R,
    ) -> Self {
        match mode {
            QuizMode::Flashcard => Self::Flashcard {
                front: item.headword_form(),
            },
            QuizMode::MultipleChoice => Self::MultipleChoice {
                question: item.headword_form(),
                choices: sample_choices(item, all_words, choice_count, max_attempts, rng),
            },
            QuizMode::Typed => Self::Typed {
                meaning: item.translation().to_owned(),
            },
        }
    }
}

//
// ─── MULTIPLE CHOICE OPTIONS ───────────────────────────────────────────────────
//

/// Translation options for one multiple-choice prompt, already in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    options: Vec<String>,
    requested: usize,
}

impl ChoiceSet {
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    /// How many options were asked for.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Options missing because the vocabulary ran out of distinct translations
    /// (or the attempt budget ran out first).
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.options.len())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Draw up to `choice_count - 1` distinct distractor translations uniformly
/// from `all_words`, retrying duplicates at most `max_attempts` times in total,
/// then shuffle them together with the correct translation.
pub fn sample_choices<R: Rng + ?Sized>(
    item: &WordEntry,
    all_words: &[WordEntry],
    choice_count: usize,
    max_attempts: u32,
    rng: &mut R,
) -> ChoiceSet {
    let mut options = vec![item.translation().to_owned()];
    let mut attempts = 0;

    while options.len() < choice_count && attempts < max_attempts && !all_words.is_empty() {
        attempts += 1;
        let candidate = all_words[rng.random_range(0..all_words.len())].translation();
        if !options.iter().any(|o| o == candidate) {
            options.push(candidate.to_owned());
        }
    }

    if options.len() < choice_count {
        log::debug!(
            "only {} of {choice_count} options for '{}' after {attempts} draws",
            options.len(),
            item.headword()
        );
    }

    options.shuffle(rng);
    ChoiceSet {
        options,
        requested: choice_count,
    }
}
