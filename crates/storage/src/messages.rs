use std::sync::Arc;

use vocab_core::model::ContactMessage;

use crate::repository::{
    LoadStatus, MESSAGES_KEY, PersistStatus, SnapshotRepository, load_json, save_json,
};

/// Append-only local log of contact messages.
pub struct MessageLog {
    repo: Arc<dyn SnapshotRepository>,
    messages: Vec<ContactMessage>,
}

impl MessageLog {
    #[must_use]
    pub fn load(repo: Arc<dyn SnapshotRepository>) -> (Self, LoadStatus) {
        let (messages, status) = load_json(repo.as_ref(), MESSAGES_KEY);
        (Self { repo, messages }, status)
    }

    pub fn append(&mut self, message: ContactMessage) -> PersistStatus {
        self.messages.push(message);
        PersistStatus::from_result(
            MESSAGES_KEY,
            save_json(self.repo.as_ref(), MESSAGES_KEY, &self.messages),
        )
    }

    #[must_use]
    pub fn messages(&self) -> &[ContactMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use vocab_core::model::ContactDraft;
    use vocab_core::time::fixed_now;

    #[test]
    fn appended_messages_are_reloaded() {
        let repo = InMemoryRepository::new();
        let (mut log, _) = MessageLog::load(Arc::new(repo.clone()));
        let msg = ContactDraft {
            name: "Ada".into(),
            email: "ada@example.org".into(),
            message: "Danke!".into(),
        }
        .validate(fixed_now())
        .unwrap();

        assert!(log.append(msg.clone()).is_saved());

        let (reloaded, status) = MessageLog::load(Arc::new(repo));
        assert_eq!(status, LoadStatus::Loaded);
        assert_eq!(reloaded.messages(), [msg]);
    }
}
