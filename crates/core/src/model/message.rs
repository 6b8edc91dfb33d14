use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::MessageId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContactError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("message cannot be empty")]
    EmptyMessage,
}

/// Contact form input before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    /// Trim every field and stamp the message.
    ///
    /// # Errors
    ///
    /// Returns `ContactError` naming the first blank field.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ContactMessage, ContactError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(ContactError::EmptyName);
        }
        let email = self.email.trim().to_owned();
        if email.is_empty() {
            return Err(ContactError::EmptyEmail);
        }
        let message = self.message.trim().to_owned();
        if message.is_empty() {
            return Err(ContactError::EmptyMessage);
        }

        Ok(ContactMessage {
            id: MessageId::generate(),
            name,
            email,
            message,
            created_at: now,
        })
    }
}

/// A message kept in the local contact log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: MessageId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn draft(name: &str, email: &str, message: &str) -> ContactDraft {
        ContactDraft {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    #[test]
    fn valid_draft_is_trimmed_and_stamped() {
        let msg = draft(" Ada ", "ada@example.org ", " hallo ")
            .validate(fixed_now())
            .unwrap();
        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.email, "ada@example.org");
        assert_eq!(msg.message, "hallo");
        assert_eq!(msg.created_at, fixed_now());
    }

    #[test]
    fn every_field_is_required() {
        assert_eq!(
            draft("", "a@b", "m").validate(fixed_now()).unwrap_err(),
            ContactError::EmptyName
        );
        assert_eq!(
            draft("n", " ", "m").validate(fixed_now()).unwrap_err(),
            ContactError::EmptyEmail
        );
        assert_eq!(
            draft("n", "a@b", "").validate(fixed_now()).unwrap_err(),
            ContactError::EmptyMessage
        );
    }
}
