//! Mode-specific correctness checks.
//!
//! Flashcard answers are self-graded and never pass through here. Multiple
//! choice compares the picked option verbatim with the translation. Typed
//! answers are normalized and compared against every headword form that shares
//! the item's translation.

use unicode_normalization::UnicodeNormalization;

use crate::model::WordEntry;

/// Result of checking one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    #[must_use]
    pub fn from_bool(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }

    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Comparison form of free text: trimmed, NFC-composed, lowercased.
#[must_use]
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().nfc().collect::<String>().to_lowercase()
}

/// Headword forms accepted for one typed prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedAnswers {
    forms: Vec<String>,
}

impl AcceptedAnswers {
    /// Collect the item's own headword form plus the form of every entry in
    /// `store` whose translation normalizes equal to the item's translation.
    ///
    /// Forms keep their stored spelling for display; duplicates (after
    /// normalization) are dropped, the item's own form always comes first.
    pub fn collect<'a>(item: &WordEntry, store: impl IntoIterator<Item = &'a WordEntry>) -> Self {
        let meaning = normalize_answer(item.translation());
        let mut forms = vec![item.headword_form()];
        let mut seen = vec![normalize_answer(&forms[0])];

        for other in store {
            if normalize_answer(other.translation()) != meaning {
                continue;
            }
            let form = other.headword_form();
            let key = normalize_answer(&form);
            if !seen.contains(&key) {
                seen.push(key);
                forms.push(form);
            }
        }

        Self { forms }
    }

    #[must_use]
    pub fn forms(&self) -> &[String] {
        &self.forms
    }

    #[must_use]
    pub fn check(&self, candidate: &str) -> Outcome {
        let candidate = normalize_answer(candidate);
        Outcome::from_bool(
            self.forms
                .iter()
                .any(|form| normalize_answer(form) == candidate),
        )
    }
}

/// Multiple choice: the selected option must be the item's translation, verbatim.
#[must_use]
pub fn check_choice(selected: &str, item: &WordEntry) -> Outcome {
    Outcome::from_bool(selected == item.translation())
}
