#![forbid(unsafe_code)]

pub mod file;
pub mod messages;
pub mod progress;
pub mod repository;
pub mod words;

pub use file::FileRepository;
pub use messages::MessageLog;
pub use progress::ProgressStore;
pub use repository::{
    InMemoryRepository, LoadStatus, PersistStatus, SnapshotRepository, StorageError,
};
pub use words::{ImportOutcome, WordRecord, WordStore};
