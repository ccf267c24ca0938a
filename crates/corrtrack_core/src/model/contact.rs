//! Contact domain model.
//!
//! # Responsibility
//! - Define the person record correspondence is logged against.
//! - Validate creation input before it reaches the record store.
//!
//! # Invariants
//! - `name` is non-empty after trimming.
//! - `id` is assigned by the store on creation and never changes.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Store-assigned contact identifier.
pub type ContactId = i64;

/// A person the user corresponds with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Free text such as `email`, `letter` or `phone`.
    pub preferred_channel: Option<String>,
    pub notes: Option<String>,
}

/// Creation input for a contact. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub preferred_channel: Option<String>,
    pub notes: Option<String>,
}

impl NewContact {
    /// Creates input with only the required name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Trims text fields and drops blank optionals.
    ///
    /// # Errors
    /// - `ValidationError::EmptyName` when the name is blank.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Self {
            name,
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            preferred_channel: non_blank(self.preferred_channel),
            notes: non_blank(self.notes),
        })
    }
}

/// Partial replacement of a contact's mutable fields.
///
/// `None` leaves a field untouched; `Some(value)` replaces it, and a blank
/// value clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub preferred_channel: Option<String>,
    pub notes: Option<String>,
}

impl ContactUpdate {
    /// Returns whether applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.phone.is_none()
            && self.preferred_channel.is_none()
            && self.notes.is_none()
    }

    /// Applies the replacement to an existing contact.
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(email) = &self.email {
            contact.email = non_blank(Some(email.clone()));
        }
        if let Some(phone) = &self.phone {
            contact.phone = non_blank(Some(phone.clone()));
        }
        if let Some(channel) = &self.preferred_channel {
            contact.preferred_channel = non_blank(Some(channel.clone()));
        }
        if let Some(notes) = &self.notes {
            contact.notes = non_blank(Some(notes.clone()));
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{Contact, ContactUpdate, NewContact};
    use crate::model::validation::ValidationError;

    #[test]
    fn normalized_rejects_blank_name() {
        let err = NewContact::new("   ").normalized().unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);
    }

    #[test]
    fn normalized_trims_and_drops_blank_optionals() {
        let input = NewContact {
            name: "  Ada Lovelace ".to_string(),
            email: Some(" ada@example.com ".to_string()),
            notes: Some("  ".to_string()),
            ..NewContact::default()
        };
        let normalized = input.normalized().unwrap();
        assert_eq!(normalized.name, "Ada Lovelace");
        assert_eq!(normalized.email.as_deref(), Some("ada@example.com"));
        assert_eq!(normalized.notes, None);
    }

    #[test]
    fn update_replaces_only_given_fields_and_blank_clears() {
        let mut contact = Contact {
            id: 1,
            name: "Ada".to_string(),
            email: Some("old@example.com".to_string()),
            phone: Some("555".to_string()),
            preferred_channel: None,
            notes: Some("met at conference".to_string()),
        };
        let update = ContactUpdate {
            preferred_channel: Some("letter".to_string()),
            notes: Some(String::new()),
            ..ContactUpdate::default()
        };
        update.apply_to(&mut contact);

        assert_eq!(contact.email.as_deref(), Some("old@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("555"));
        assert_eq!(contact.preferred_channel.as_deref(), Some("letter"));
        assert_eq!(contact.notes, None);
    }
}
