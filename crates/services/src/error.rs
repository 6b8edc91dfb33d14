//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;
use vocab_core::model::{ContactError, QuizMode, SettingsError};

/// Errors emitted by the session engine.
///
/// `EmptyPool` is the user-facing "no data" condition. The rest report calls
/// that do not fit the current session state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no words available for this session")]
    EmptyPool,
    #[error("no session has been started")]
    NotStarted,
    #[error("session already completed")]
    Completed,
    #[error("session is still running")]
    NotFinished,
    #[error("{answer} answers do not apply to {mode} sessions")]
    ModeMismatch { mode: QuizMode, answer: &'static str },
    #[error("the current item has not been presented")]
    NotPresented,
    #[error("option {index} does not exist ({len} options)")]
    InvalidChoice { index: usize, len: usize },
    #[error("{0} prompts have nothing to reveal")]
    NothingToReveal(QuizMode),
}

/// Errors emitted while reading or writing CSV word lists.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("could not write CSV: {0}")]
    Export(String),
}

/// Errors emitted by `SettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ContactService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContactServiceError {
    #[error(transparent)]
    Contact(#[from] ContactError),
}

/// Any failure surfaced by the trainer's operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrainerError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Settings(#[from] SettingsServiceError),
    #[error(transparent)]
    Contact(#[from] ContactServiceError),
}
