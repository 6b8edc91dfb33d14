mod ids;
mod level;
mod message;
mod mode;
mod progress;
mod settings;
mod word;

pub use ids::{MessageId, ParseIdError, WordId};
pub use level::{KNOWN_LEVELS, LevelAssignment, LevelFilter, detect_level, normalize_level};
pub use message::{ContactDraft, ContactError, ContactMessage};
pub use mode::{ParseModeError, QuizMode};
pub use progress::ProgressRecord;
pub use settings::{SettingsError, TrainerSettings, TrainerSettingsDraft};
pub use word::{WordEntry, WordError, WordRow};
