//! Correspondence entry domain model.
//!
//! # Responsibility
//! - Define one logged message/interaction tied to a contact.
//! - Normalize tag labels and direction text.
//!
//! # Invariants
//! - `contact_id` resolves to a live contact (enforced by the store).
//! - `follow_up_date` has no ordering constraint against `timestamp`; a
//!   follow-up dated in the past is still a pending state, not an error.
//! - `tags` is a set: trimmed, lowercased, no empty labels.

use crate::model::contact::{non_blank, ContactId};
use crate::model::timestamp::Timestamp;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned correspondence identifier.
pub type EntryId = i64;

/// Response status assigned to new entries when none is supplied.
pub const DEFAULT_RESPONSE_STATUS: &str = "pending";

/// Which way a message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Sent by the user to the contact.
    Outgoing,
    /// Received by the user from the contact.
    Incoming,
}

impl Direction {
    /// Stable storage/wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Incoming => "incoming",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "outgoing" => Ok(Self::Outgoing),
            "incoming" => Ok(Self::Incoming),
            _ => Err(ValidationError::InvalidDirection(value.to_string())),
        }
    }
}

/// One logged message or interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrespondenceEntry {
    pub id: EntryId,
    pub contact_id: ContactId,
    pub direction: Direction,
    /// When the correspondence happened (user supplied).
    pub timestamp: Timestamp,
    /// Email, letter, call, etc.
    pub medium: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub tags: BTreeSet<String>,
    /// When present, the entry asks for a future action.
    pub follow_up_date: Option<Timestamp>,
    /// User-supplied sentiment label; the computed tone tally is separate.
    pub sentiment: Option<String>,
    pub related_topic: Option<String>,
    /// Free-text metadata; reminder status never reads it.
    pub response_status: String,
}

impl CorrespondenceEntry {
    /// Returns whether this entry carries a follow-up date.
    pub fn has_follow_up(&self) -> bool {
        self.follow_up_date.is_some()
    }

    /// Subject and body joined for keyword scanning.
    pub fn scan_text(&self) -> String {
        [self.subject.as_deref(), self.body.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Typed creation input for an entry. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub contact_id: ContactId,
    pub direction: Direction,
    pub timestamp: Timestamp,
    pub medium: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub tags: BTreeSet<String>,
    pub follow_up_date: Option<Timestamp>,
    pub sentiment: Option<String>,
    pub related_topic: Option<String>,
    pub response_status: String,
}

impl NewEntry {
    /// Creates input with required fields set and everything else empty.
    pub fn new(contact_id: ContactId, direction: Direction, timestamp: Timestamp) -> Self {
        Self {
            contact_id,
            direction,
            timestamp,
            medium: None,
            subject: None,
            body: None,
            tags: BTreeSet::new(),
            follow_up_date: None,
            sentiment: None,
            related_topic: None,
            response_status: DEFAULT_RESPONSE_STATUS.to_string(),
        }
    }

    /// Drops blank optional text and re-normalizes tags. Non-blank free
    /// text is kept exactly as supplied.
    pub fn normalized(self) -> Self {
        let response_status = non_blank(Some(self.response_status))
            .unwrap_or_else(|| DEFAULT_RESPONSE_STATUS.to_string());
        Self {
            medium: drop_blank(self.medium),
            subject: drop_blank(self.subject),
            body: drop_blank(self.body),
            tags: normalize_tags(self.tags),
            sentiment: drop_blank(self.sentiment),
            related_topic: drop_blank(self.related_topic),
            response_status,
            ..self
        }
    }

    /// Builds the persisted record once the store has assigned an id.
    pub fn into_entry(self, id: EntryId) -> CorrespondenceEntry {
        CorrespondenceEntry {
            id,
            contact_id: self.contact_id,
            direction: self.direction,
            timestamp: self.timestamp,
            medium: self.medium,
            subject: self.subject,
            body: self.body,
            tags: self.tags,
            follow_up_date: self.follow_up_date,
            sentiment: self.sentiment,
            related_topic: self.related_topic,
            response_status: self.response_status,
        }
    }
}

/// Inclusive time window used by entry listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl DateRange {
    /// Creates a window, rejecting `start > end`.
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Result<Self, ValidationError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ValidationError::InvertedDateRange);
            }
        }
        Ok(Self { start, end })
    }

    /// Returns whether `value` falls inside the window.
    pub fn contains(&self, value: &Timestamp) -> bool {
        self.start.map_or(true, |start| *value >= start)
            && self.end.map_or(true, |end| *value <= end)
    }
}

fn drop_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Normalizes one tag label. Blank labels yield `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag labels.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|tag| normalize_tag(tag.as_ref()))
        .collect()
}
