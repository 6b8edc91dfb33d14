use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The three ways a session can quiz the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuizMode {
    /// Show the headword, flip for the meaning, grade yourself.
    #[default]
    Flashcard,
    /// Pick the translation among sampled options.
    MultipleChoice,
    /// Read the translation, type the headword with its article.
    Typed,
}

impl QuizMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Flashcard => "flash",
            QuizMode::MultipleChoice => "mcq",
            QuizMode::Typed => "type",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown quiz mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for QuizMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flash" | "flashcard" => Ok(Self::Flashcard),
            "mcq" | "choice" | "multiple-choice" => Ok(Self::MultipleChoice),
            "type" | "typed" | "typing" => Ok(Self::Typed),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
