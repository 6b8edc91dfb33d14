use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Snapshot key of the word collection.
pub const WORDS_KEY: &str = "vocab_words";
/// Snapshot key of the progress record.
pub const PROGRESS_KEY: &str = "vocab_progress";
/// Snapshot key of the contact message log.
pub const MESSAGES_KEY: &str = "vocab_messages";
/// Snapshot key of the trainer settings.
pub const SETTINGS_KEY: &str = "vocab_settings";

/// Errors surfaced by snapshot backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("malformed snapshot `{key}`: {reason}")]
    Malformed { key: String, reason: String },
}

/// Outcome of a best-effort write.
///
/// A failed write never fails the operation that triggered it; the in-memory
/// state stays authoritative and the caller decides whether to warn.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum PersistStatus {
    Saved,
    Failed(StorageError),
}

impl PersistStatus {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }

    /// The failure, if the write did not go through.
    #[must_use]
    pub fn warning(&self) -> Option<&StorageError> {
        match self {
            Self::Saved => None,
            Self::Failed(err) => Some(err),
        }
    }

    pub(crate) fn from_result(key: &str, result: Result<(), StorageError>) -> Self {
        match result {
            Ok(()) => Self::Saved,
            Err(err) => {
                log::warn!("failed to persist `{key}`, keeping in-memory state: {err}");
                Self::Failed(err)
            }
        }
    }
}

/// How a store got its initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// A snapshot was found and parsed.
    Loaded,
    /// No snapshot yet; started from the empty default.
    Missing,
    /// A snapshot was found but could not be parsed; started from the default.
    Malformed(StorageError),
    /// The backend could not be read; started from the default.
    Unavailable(StorageError),
}

impl LoadStatus {
    #[must_use]
    pub fn warning(&self) -> Option<&StorageError> {
        match self {
            Self::Loaded | Self::Missing => None,
            Self::Malformed(err) | Self::Unavailable(err) => Some(err),
        }
    }
}

/// Key–value persistence of serialized snapshots.
pub trait SnapshotRepository: Send + Sync {
    /// Read the snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the snapshot stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend refuses the delete.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Load and decode a JSON snapshot, falling back to `T::default()`.
///
/// Never fails: problems are logged and reported through `LoadStatus`.
pub fn load_json<T>(repo: &dyn SnapshotRepository, key: &str) -> (T, LoadStatus)
where
    T: DeserializeOwned + Default,
{
    let raw = match repo.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (T::default(), LoadStatus::Missing),
        Err(err) => {
            log::warn!("could not read `{key}`, starting empty: {err}");
            return (T::default(), LoadStatus::Unavailable(err));
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => (value, LoadStatus::Loaded),
        Err(err) => {
            log::warn!("snapshot `{key}` is malformed, starting empty: {err}");
            let err = StorageError::Malformed {
                key: key.to_owned(),
                reason: err.to_string(),
            };
            (T::default(), LoadStatus::Malformed(err))
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails, or the backend error.
pub fn save_json<T: Serialize + ?Sized>(
    repo: &dyn SnapshotRepository,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    repo.save(key, &raw)
}

/// In-memory repository for tests and throwaway sessions.
///
/// Writes can be switched off to simulate disabled or full storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    snapshots: Arc<Mutex<HashMap<String, String>>>,
    reject_writes: Arc<AtomicBool>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save`/`remove` fail (or succeed again).
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes are disabled".into()));
        }
        Ok(())
    }
}

impl SnapshotRepository for InMemoryRepository {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}
