//! Repository error taxonomy.

use crate::db::DbError;
use crate::model::contact::ContactId;
use crate::model::entry::EntryId;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of a directory, log, reminder or insight operation.
#[derive(Debug)]
pub enum RepoError {
    /// Malformed or missing required input.
    Validation(ValidationError),
    /// Record store failure, propagated unmodified.
    Db(DbError),
    /// No contact with this id.
    ContactNotFound(ContactId),
    /// No correspondence entry with this id.
    EntryNotFound(EntryId),
    /// A persisted row could not be decoded.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether this error references a nonexistent record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ContactNotFound(_) | Self::EntryNotFound(_))
    }

    /// Returns whether this error is an input validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::EntryNotFound(id) => write!(f, "correspondence entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::ContactNotFound(_) | Self::EntryNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
