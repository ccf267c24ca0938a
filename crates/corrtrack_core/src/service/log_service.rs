//! Correspondence log use-cases.
//!
//! # Responsibility
//! - Validate raw log input (direction text, timestamp text) into typed
//!   entries before persistence.
//! - Provide filtered history listing and metadata correction.
//!
//! # Invariants
//! - Invalid input never reaches the store.
//! - History order is `timestamp DESC, id ASC`.

use crate::model::contact::ContactId;
use crate::model::entry::{CorrespondenceEntry, Direction, EntryId, NewEntry};
use crate::model::timestamp::parse_timestamp;
use crate::model::validation::ValidationError;
use crate::repo::entry_repo::{EntryListQuery, EntryRepository};
use crate::repo::error::{RepoError, RepoResult};
use log::{info, warn};

/// Raw request for logging one correspondence entry.
///
/// `direction`, `timestamp` and `follow_up_date` are user text and are
/// parsed by `CorrespondenceLog::log_entry`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntryRequest {
    pub contact_id: ContactId,
    /// `incoming` or `outgoing`.
    pub direction: String,
    /// ISO-8601 date/time the correspondence happened.
    pub timestamp: String,
    pub medium: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub tags: Vec<String>,
    pub follow_up_date: Option<String>,
    pub sentiment: Option<String>,
    pub related_topic: Option<String>,
    /// Defaults to `pending` when absent.
    pub response_status: Option<String>,
}

impl LogEntryRequest {
    /// Parses the raw request into a typed entry.
    ///
    /// # Errors
    /// - `ValidationError::InvalidDirection` for unknown direction text.
    /// - `ValidationError::InvalidTimestamp` for unparsable timestamps.
    pub fn to_new_entry(&self) -> Result<NewEntry, ValidationError> {
        let direction = self.direction.parse::<Direction>()?;
        let timestamp = parse_timestamp(&self.timestamp)?;
        let follow_up_date = self
            .follow_up_date
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        let mut entry = NewEntry::new(self.contact_id, direction, timestamp);
        entry.medium = self.medium.clone();
        entry.subject = self.subject.clone();
        entry.body = self.body.clone();
        entry.tags = self.tags.iter().cloned().collect();
        entry.follow_up_date = follow_up_date;
        entry.sentiment = self.sentiment.clone();
        entry.related_topic = self.related_topic.clone();
        if let Some(status) = &self.response_status {
            entry.response_status = status.clone();
        }
        Ok(entry.normalized())
    }
}

/// CRUD and filtered listing over correspondence entries.
pub struct CorrespondenceLog<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> CorrespondenceLog<R> {
    /// Creates a log using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists one entry.
    ///
    /// # Errors
    /// - `RepoError::Validation` for bad direction or timestamp text.
    /// - `RepoError::ContactNotFound` when `contact_id` does not resolve; no
    ///   row is written in that case.
    pub fn log_entry(&self, request: &LogEntryRequest) -> RepoResult<CorrespondenceEntry> {
        let entry = request.to_new_entry().map_err(|err| {
            warn!("event=entry_log module=log status=rejected error_code=validation error={err}");
            err
        })?;
        let created = self.repo.create_entry(entry)?;
        info!(
            "event=entry_log module=log status=ok entry_id={} contact_id={} direction={} follow_up={}",
            created.id,
            created.contact_id,
            created.direction,
            created.has_follow_up()
        );
        Ok(created)
    }

    /// Lists entries matching `query`, newest first, id ascending on ties.
    pub fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<CorrespondenceEntry>> {
        self.repo.list_entries(query)
    }

    /// Gets one entry by id.
    ///
    /// # Errors
    /// - `RepoError::EntryNotFound` when no such id exists.
    pub fn get_entry(&self, id: EntryId) -> RepoResult<CorrespondenceEntry> {
        self.repo.get_entry(id)?.ok_or(RepoError::EntryNotFound(id))
    }

    /// Corrects the free-text response status of an entry.
    ///
    /// Reminder status is unaffected; see `ReminderEngine`.
    pub fn update_response_status(
        &self,
        id: EntryId,
        status: &str,
    ) -> RepoResult<CorrespondenceEntry> {
        let status = status.trim();
        if status.is_empty() {
            return Err(ValidationError::EmptyResponseStatus.into());
        }

        self.repo.update_response_status(id, status)?;
        info!("event=entry_status module=log status=ok entry_id={id}");
        self.get_entry(id)
    }
}
