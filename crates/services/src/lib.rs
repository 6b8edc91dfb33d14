#![forbid(unsafe_code)]

pub mod contact_service;
pub mod error;
pub mod import;
pub mod pool;
pub mod revision;
pub mod sessions;
pub mod settings_service;
pub mod trainer;

pub use vocab_core::Clock;
pub use sessions as session;

pub use contact_service::ContactService;
pub use error::{
    ContactServiceError, ImportError, SessionError, SettingsServiceError, TrainerError,
};
pub use import::{FileReport, FileStatus, ImportReport, TEMPLATE_CSV};
pub use pool::{Pool, PoolBuilder};
pub use revision::{RevisionPage, RevisionQuery};
pub use settings_service::SettingsService;
pub use trainer::{Trainer, TrainerStats};

pub use sessions::{
    Answer, ChoiceSet, Evaluation, Presentation, Prompt, PromptKind, Reveal, SelfGrade,
    SessionEngine, SessionPhase, SessionProgress,
};
