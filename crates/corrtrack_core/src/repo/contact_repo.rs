//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/update over the `contacts` table.
//!
//! # Invariants
//! - Creation goes through `NewContact::normalized()`.
//! - Listing is ordered by id ascending.
//! - No delete path exists.

use crate::model::contact::{Contact, ContactId, ContactUpdate, NewContact};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone,
    preferred_channel,
    notes
FROM contacts";

/// Repository interface for contact records.
pub trait ContactRepository {
    fn create_contact(&self, contact: NewContact) -> RepoResult<Contact>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn list_contacts(&self) -> RepoResult<Vec<Contact>>;
    fn update_contact(&self, id: ContactId, update: &ContactUpdate) -> RepoResult<Contact>;
}

/// SQLite-backed contact repository.
#[derive(Clone, Copy)]
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Wraps a migrated connection from `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, contact: NewContact) -> RepoResult<Contact> {
        let contact = contact.normalized()?;

        self.conn.execute(
            "INSERT INTO contacts (name, email, phone, preferred_channel, notes)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                contact.name.as_str(),
                contact.email.as_deref(),
                contact.phone.as_deref(),
                contact.preferred_channel.as_deref(),
                contact.notes.as_deref(),
            ],
        )?;

        Ok(Contact {
            id: self.conn.last_insert_rowid(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            preferred_channel: contact.preferred_channel,
            notes: contact.notes,
        })
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let contact = self
            .conn
            .query_row(
                &format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_contact_row,
            )
            .optional()?;
        Ok(contact)
    }

    fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))?;
        let contacts = stmt
            .query_map([], parse_contact_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    fn update_contact(&self, id: ContactId, update: &ContactUpdate) -> RepoResult<Contact> {
        let mut contact = self
            .get_contact(id)?
            .ok_or(RepoError::ContactNotFound(id))?;
        if update.is_empty() {
            return Ok(contact);
        }

        update.apply_to(&mut contact);
        self.conn.execute(
            "UPDATE contacts
             SET
                email = ?2,
                phone = ?3,
                preferred_channel = ?4,
                notes = ?5
             WHERE id = ?1;",
            params![
                id,
                contact.email.as_deref(),
                contact.phone.as_deref(),
                contact.preferred_channel.as_deref(),
                contact.notes.as_deref(),
            ],
        )?;

        Ok(contact)
    }
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        preferred_channel: row.get("preferred_channel")?,
        notes: row.get("notes")?,
    })
}
