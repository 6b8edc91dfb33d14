use std::sync::Arc;

use storage::repository::{SETTINGS_KEY, load_json, save_json};
use storage::{LoadStatus, SnapshotRepository};
use vocab_core::model::{TrainerSettings, TrainerSettingsDraft};

use crate::error::SettingsServiceError;

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SnapshotRepository>,
}

impl SettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn SnapshotRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings, or defaults if missing, unreadable or invalid.
    #[must_use]
    pub fn load(&self) -> (TrainerSettings, LoadStatus) {
        let (draft, status): (TrainerSettingsDraft, _) =
            load_json(self.repo.as_ref(), SETTINGS_KEY);
        match draft.validate() {
            Ok(settings) => (settings, status),
            Err(err) => {
                log::warn!("ignoring stored settings: {err}");
                (TrainerSettings::default(), status)
            }
        }
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` if validation fails or persistence fails.
    pub fn save(
        &self,
        draft: TrainerSettingsDraft,
    ) -> Result<TrainerSettings, SettingsServiceError> {
        let settings = draft.validate()?;
        save_json(self.repo.as_ref(), SETTINGS_KEY, &settings.to_draft())?;
        Ok(settings)
    }
}
