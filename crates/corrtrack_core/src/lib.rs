//! Core domain logic for the correspondence tracker.
//!
//! Contacts, the correspondence logged with them, follow-up reminders and
//! relationship insights, over a local SQLite record store. This crate owns
//! every business invariant; the CLI only parses arguments and prints.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{Contact, ContactId, ContactUpdate, NewContact};
pub use model::entry::{
    CorrespondenceEntry, DateRange, Direction, EntryId, NewEntry, DEFAULT_RESPONSE_STATUS,
};
pub use model::timestamp::{format_timestamp, parse_range_end, parse_timestamp, Timestamp};
pub use model::validation::ValidationError;
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository};
pub use repo::entry_repo::{EntryListQuery, EntryRepository, SqliteEntryRepository};
pub use repo::error::{RepoError, RepoResult};
pub use service::contact_service::ContactDirectory;
pub use service::insight_service::{
    ActiveView, ActiveViewQuery, ContactInsight, InsightConfig, InsightEngine, Suggestion,
};
pub use service::log_service::{CorrespondenceLog, LogEntryRequest};
pub use service::reminder_service::{Reminder, ReminderEngine, ReminderQuery, ReminderStatus};
pub use service::tone::{KeywordToneScorer, Tone, ToneScorer, ToneTally};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
