//! Contact directory use-cases.
//!
//! # Responsibility
//! - Provide add/list/get/update entry points for contacts.
//! - Turn absent lookups into `ContactNotFound`.

use crate::model::contact::{Contact, ContactId, ContactUpdate, NewContact};
use crate::repo::contact_repo::ContactRepository;
use crate::repo::error::{RepoError, RepoResult};
use log::info;

/// CRUD wrapper over contact records.
pub struct ContactDirectory<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactDirectory<R> {
    /// Creates a directory using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new contact with a fresh id.
    ///
    /// # Errors
    /// - `RepoError::Validation` when the name is empty.
    pub fn add_contact(&self, contact: NewContact) -> RepoResult<Contact> {
        let created = self.repo.create_contact(contact)?;
        info!(
            "event=contact_add module=directory status=ok contact_id={}",
            created.id
        );
        Ok(created)
    }

    /// Lists every contact ordered by id ascending.
    pub fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        self.repo.list_contacts()
    }

    /// Gets one contact by id.
    ///
    /// # Errors
    /// - `RepoError::ContactNotFound` when no such id exists.
    pub fn get_contact(&self, id: ContactId) -> RepoResult<Contact> {
        self.repo
            .get_contact(id)?
            .ok_or(RepoError::ContactNotFound(id))
    }

    /// Replaces email/phone/channel/notes on an existing contact.
    pub fn update_contact(&self, id: ContactId, update: &ContactUpdate) -> RepoResult<Contact> {
        let updated = self.repo.update_contact(id, update)?;
        info!("event=contact_update module=directory status=ok contact_id={id}");
        Ok(updated)
    }
}
