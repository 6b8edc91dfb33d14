use std::sync::Arc;

use storage::{LoadStatus, MessageLog, PersistStatus, SnapshotRepository};
use vocab_core::model::{ContactDraft, ContactMessage};

use crate::Clock;
use crate::error::ContactServiceError;

/// Validates contact submissions and keeps them in the local message log.
pub struct ContactService {
    clock: Clock,
    log: MessageLog,
}

impl ContactService {
    #[must_use]
    pub fn open(clock: Clock, repo: Arc<dyn SnapshotRepository>) -> (Self, LoadStatus) {
        let (log, status) = MessageLog::load(repo);
        (Self { clock, log }, status)
    }

    /// Validate `draft`, stamp it with the current time and append it.
    ///
    /// # Errors
    ///
    /// Returns `ContactServiceError::Contact` if a field is blank. A failed
    /// write is reported through the returned `PersistStatus`.
    pub fn submit(
        &mut self,
        draft: ContactDraft,
    ) -> Result<(ContactMessage, PersistStatus), ContactServiceError> {
        let message = draft.validate(self.clock.now())?;
        let persist = self.log.append(message.clone());
        log::info!("stored contact message {}", message.id);
        Ok((message, persist))
    }

    #[must_use]
    pub fn messages(&self) -> &[ContactMessage] {
        self.log.messages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryRepository;
    use vocab_core::model::ContactError;
    use vocab_core::time::{fixed_clock, fixed_now};

    fn draft(name: &str) -> ContactDraft {
        ContactDraft {
            name: name.into(),
            email: "ada@example.org".into(),
            message: "Mehr B2 Wörter bitte".into(),
        }
    }

    #[test]
    fn submit_stamps_and_persists() {
        let repo = InMemoryRepository::new();
        let (mut service, _) = ContactService::open(fixed_clock(), Arc::new(repo.clone()));
        let (message, persist) = service.submit(draft("Ada")).unwrap();

        assert!(persist.is_saved());
        assert_eq!(message.created_at, fixed_now());
        assert_eq!(service.messages(), [message.clone()]);

        let (reopened, status) = ContactService::open(fixed_clock(), Arc::new(repo));
        assert_eq!(status, LoadStatus::Loaded);
        assert_eq!(reopened.messages(), [message]);
    }

    #[test]
    fn blank_name_is_rejected() {
        let (mut service, _) =
            ContactService::open(fixed_clock(), Arc::new(InMemoryRepository::new()));
        let err = service.submit(draft("  ")).unwrap_err();
        assert!(matches!(
            err,
            ContactServiceError::Contact(ContactError::EmptyName)
        ));
        assert!(service.messages().is_empty());
    }
}
