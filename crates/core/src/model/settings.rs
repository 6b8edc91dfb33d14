use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::level::normalize_level;

pub const DEFAULT_CHOICE_COUNT: usize = 4;
pub const DEFAULT_DISTRACTOR_ATTEMPTS: u32 = 200;
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_FALLBACK_LEVEL: &str = "OTHERS";
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 800;

/// Tunables of the trainer, persisted alongside the word list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainerSettings {
    choice_count: usize,
    distractor_attempts: u32,
    page_size: usize,
    fallback_level: String,
    feedback_delay_ms: u64,
}

/// Unvalidated settings as read from storage or user input.
///
/// Missing fields take their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainerSettingsDraft {
    pub choice_count: Option<usize>,
    pub distractor_attempts: Option<u32>,
    pub page_size: Option<usize>,
    pub fallback_level: Option<String>,
    pub feedback_delay_ms: Option<u64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("multiple choice needs at least 2 options, got {0}")]
    InvalidChoiceCount(usize),

    #[error("distractor attempts must be > 0")]
    InvalidDistractorAttempts,

    #[error("page size must be > 0")]
    InvalidPageSize,

    #[error("fallback level cannot be empty")]
    EmptyFallbackLevel,
}

impl TrainerSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` when a present value is out of range.
    pub fn validate(self) -> Result<TrainerSettings, SettingsError> {
        let choice_count = self.choice_count.unwrap_or(DEFAULT_CHOICE_COUNT);
        if choice_count < 2 {
            return Err(SettingsError::InvalidChoiceCount(choice_count));
        }
        let distractor_attempts = self
            .distractor_attempts
            .unwrap_or(DEFAULT_DISTRACTOR_ATTEMPTS);
        if distractor_attempts == 0 {
            return Err(SettingsError::InvalidDistractorAttempts);
        }
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(SettingsError::InvalidPageSize);
        }
        let fallback_level = match self.fallback_level {
            Some(raw) => normalize_level(&raw),
            None => DEFAULT_FALLBACK_LEVEL.to_owned(),
        };
        if fallback_level.is_empty() {
            return Err(SettingsError::EmptyFallbackLevel);
        }

        Ok(TrainerSettings {
            choice_count,
            distractor_attempts,
            page_size,
            fallback_level,
            feedback_delay_ms: self.feedback_delay_ms.unwrap_or(DEFAULT_FEEDBACK_DELAY_MS),
        })
    }
}

impl TrainerSettings {
    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.choice_count
    }

    #[must_use]
    pub fn distractor_attempts(&self) -> u32 {
        self.distractor_attempts
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn fallback_level(&self) -> &str {
        &self.fallback_level
    }

    #[must_use]
    pub fn feedback_delay_ms(&self) -> u64 {
        self.feedback_delay_ms
    }

    /// Convert back into a draft, e.g. to tweak one value and re-validate.
    #[must_use]
    pub fn to_draft(&self) -> TrainerSettingsDraft {
        TrainerSettingsDraft {
            choice_count: Some(self.choice_count),
            distractor_attempts: Some(self.distractor_attempts),
            page_size: Some(self.page_size),
            fallback_level: Some(self.fallback_level.clone()),
            feedback_delay_ms: Some(self.feedback_delay_ms),
        }
    }
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            choice_count: DEFAULT_CHOICE_COUNT,
            distractor_attempts: DEFAULT_DISTRACTOR_ATTEMPTS,
            page_size: DEFAULT_PAGE_SIZE,
            fallback_level: DEFAULT_FALLBACK_LEVEL.to_owned(),
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
        }
    }
}
