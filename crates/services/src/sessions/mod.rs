mod engine;
mod progress;
mod prompt;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::{Answer, Evaluation, Presentation, Reveal, SelfGrade, SessionEngine};
pub use progress::{SessionPhase, SessionProgress};
pub use prompt::{ChoiceSet, Prompt, PromptKind, sample_choices};
