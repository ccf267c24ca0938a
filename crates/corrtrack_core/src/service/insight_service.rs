//! Relationship-health summaries.
//!
//! # Responsibility
//! - Aggregate per-contact statistics from the correspondence log.
//! - Recommend a next touchpoint from simple rules.
//! - Build the active view: contacted contacts by recency, with
//!   never-contacted contacts in their own bucket.
//!
//! # Invariants
//! - Tone scoring goes through `ToneScorer` only; aggregation never inspects
//!   keywords itself.
//! - A contact with zero entries has no last-contact date and is never mixed
//!   into the recency ordering.

use crate::model::contact::{Contact, ContactId};
use crate::model::entry::{CorrespondenceEntry, Direction, EntryId};
use crate::model::timestamp::Timestamp;
use crate::model::validation::ValidationError;
use crate::repo::contact_repo::ContactRepository;
use crate::repo::entry_repo::{EntryListQuery, EntryRepository};
use crate::repo::error::{RepoError, RepoResult};
use crate::service::reminder_service::{classify, ReminderStatus};
use crate::service::tone::{KeywordToneScorer, ToneScorer, ToneTally};
use chrono::TimeDelta;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Tunables for insight rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightConfig {
    /// Suggest reaching out when the last contact is older than this.
    pub stale_after_days: i64,
    /// Cadence used for `suggested_follow_up_date`.
    pub follow_up_cadence_days: i64,
}

impl InsightConfig {
    /// # Errors
    /// - `ValidationError::NegativeDayCount` for a negative threshold or cadence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_day_count("stale_after_days", self.stale_after_days)?;
        check_day_count("follow_up_cadence_days", self.follow_up_cadence_days)
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            stale_after_days: 30,
            follow_up_cadence_days: 14,
        }
    }
}

/// Recommended next action for a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    /// An outstanding follow-up exists; the most urgent one is surfaced.
    FollowUp {
        entry_id: EntryId,
        due: Timestamp,
        status: ReminderStatus,
        days_until_due: i64,
    },
    /// Last contact is older than the stale threshold.
    ReachOut { days_since_last_contact: i64 },
    /// Nothing has ever been logged for this contact.
    FirstContact,
    NoActionNeeded,
}

/// Per-contact relationship summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactInsight {
    pub contact: Contact,
    pub total_count: u32,
    pub outgoing_count: u32,
    pub incoming_count: u32,
    pub last_contact_date: Option<Timestamp>,
    pub tone: ToneTally,
    /// Most recent user-supplied sentiment label.
    pub latest_sentiment: Option<String>,
    /// Mean days between consecutive entries, 2 decimals.
    pub average_gap_days: Option<f64>,
    /// Last contact plus the configured cadence.
    pub suggested_follow_up_date: Option<Timestamp>,
    pub suggestion: Suggestion,
}

/// Active view buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActiveView {
    /// Contacted within the window (or at all, without a window), most
    /// recent first, contact id ascending on ties.
    pub recent: Vec<ContactInsight>,
    /// Contacted, but only before the window. Same ordering as `recent`.
    pub dormant: Vec<ContactInsight>,
    /// Zero entries, contact id ascending.
    pub never_contacted: Vec<ContactInsight>,
}

/// Active view options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveViewQuery {
    /// Only count contacts whose last entry is within this many days of
    /// `now` as recent.
    pub within_days: Option<i64>,
}

/// Summarizes one contact's entries as of `now`.
pub fn summarize(
    contact: Contact,
    entries: &[CorrespondenceEntry],
    now: Timestamp,
    config: &InsightConfig,
    scorer: &impl ToneScorer,
) -> ContactInsight {
    let mut outgoing_count = 0;
    let mut incoming_count = 0;
    let mut tone = ToneTally::default();
    for entry in entries {
        match entry.direction {
            Direction::Outgoing => outgoing_count += 1,
            Direction::Incoming => incoming_count += 1,
        }
        tone.record(scorer.score(&entry.scan_text()));
    }

    let last_contact_date = entries.iter().map(|entry| entry.timestamp).max();
    let latest_sentiment = entries
        .iter()
        .filter(|entry| entry.sentiment.is_some())
        .max_by(|left, right| {
            left.timestamp
                .cmp(&right.timestamp)
                .then(right.id.cmp(&left.id))
        })
        .and_then(|entry| entry.sentiment.clone());
    let suggested_follow_up_date = last_contact_date.and_then(|last| {
        TimeDelta::try_days(config.follow_up_cadence_days)
            .and_then(|cadence| last.checked_add_signed(cadence))
    });
    let suggestion = suggest_next_touchpoint(entries, last_contact_date, now, config);

    ContactInsight {
        contact,
        total_count: outgoing_count + incoming_count,
        outgoing_count,
        incoming_count,
        last_contact_date,
        tone,
        latest_sentiment,
        average_gap_days: average_gap_days(entries),
        suggested_follow_up_date,
        suggestion,
    }
}

/// Applies the next-touchpoint rules in priority order: outstanding
/// follow-up, never contacted, stale, otherwise nothing.
pub fn suggest_next_touchpoint(
    entries: &[CorrespondenceEntry],
    last_contact_date: Option<Timestamp>,
    now: Timestamp,
    config: &InsightConfig,
) -> Suggestion {
    let most_urgent = entries
        .iter()
        .filter_map(|entry| entry.follow_up_date.map(|due| (due, entry.id)))
        .min();
    if let Some((due, entry_id)) = most_urgent {
        let (status, days_until_due) = classify(due, now);
        return Suggestion::FollowUp {
            entry_id,
            due,
            status,
            days_until_due,
        };
    }

    let Some(last) = last_contact_date else {
        return Suggestion::FirstContact;
    };

    match days_before(now, config.stale_after_days) {
        Some(stale_before) if last < stale_before => Suggestion::ReachOut {
            days_since_last_contact: (now - last).num_days(),
        },
        _ => Suggestion::NoActionNeeded,
    }
}

/// `now` minus `days`, or `None` when that instant is not representable.
fn days_before(now: Timestamp, days: i64) -> Option<Timestamp> {
    TimeDelta::try_days(days).and_then(|delta| now.checked_sub_signed(delta))
}

fn check_day_count(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        Err(ValidationError::NegativeDayCount { field, value })
    } else {
        Ok(())
    }
}

/// Mean gap in days between consecutive entries, rounded to 2 decimals.
///
/// `None` with fewer than two entries.
pub fn average_gap_days(entries: &[CorrespondenceEntry]) -> Option<f64> {
    if entries.len() < 2 {
        return None;
    }

    let mut timestamps = entries
        .iter()
        .map(|entry| entry.timestamp)
        .collect::<Vec<_>>();
    timestamps.sort_unstable();

    let total_seconds = timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64)
        .sum::<f64>();
    let mean_days = total_seconds / (timestamps.len() - 1) as f64 / 86_400.0;
    Some((mean_days * 100.0).round() / 100.0)
}

/// Aggregates relationship health from contacts and their entries.
pub struct InsightEngine<C: ContactRepository, E: EntryRepository, T: ToneScorer = KeywordToneScorer>
{
    contacts: C,
    entries: E,
    config: InsightConfig,
    scorer: T,
}

impl<C: ContactRepository, E: EntryRepository> InsightEngine<C, E> {
    /// Creates an engine with the default keyword tone scorer.
    pub fn new(contacts: C, entries: E, config: InsightConfig) -> Self {
        Self::with_scorer(contacts, entries, config, KeywordToneScorer::default())
    }
}

impl<C: ContactRepository, E: EntryRepository, T: ToneScorer> InsightEngine<C, E, T> {
    /// Creates an engine with a caller-supplied tone scorer.
    pub fn with_scorer(contacts: C, entries: E, config: InsightConfig, scorer: T) -> Self {
        Self {
            contacts,
            entries,
            config,
            scorer,
        }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Summarizes one contact.
    ///
    /// # Errors
    /// - `RepoError::Validation` when the config holds a negative day count.
    /// - `RepoError::ContactNotFound` when the contact does not exist.
    pub fn insights(&self, contact_id: ContactId, now: Timestamp) -> RepoResult<ContactInsight> {
        self.config.validate()?;
        let contact = self
            .contacts
            .get_contact(contact_id)?
            .ok_or(RepoError::ContactNotFound(contact_id))?;
        let entries = self
            .entries
            .list_entries(&EntryListQuery::for_contact(contact_id))?;

        Ok(summarize(
            contact,
            &entries,
            now,
            &self.config,
            &self.scorer,
        ))
    }

    /// Summarizes every contact and buckets them by recency.
    ///
    /// A window reaching past the earliest representable instant counts
    /// every contacted contact as recent.
    ///
    /// # Errors
    /// - `RepoError::Validation` for a negative window or config day count.
    pub fn active_view(&self, now: Timestamp, query: &ActiveViewQuery) -> RepoResult<ActiveView> {
        self.config.validate()?;
        if let Some(days) = query.within_days {
            check_day_count("within_days", days)?;
        }

        let mut entries_by_contact: HashMap<ContactId, Vec<CorrespondenceEntry>> = HashMap::new();
        for entry in self.entries.list_entries(&EntryListQuery::default())? {
            entries_by_contact
                .entry(entry.contact_id)
                .or_default()
                .push(entry);
        }

        let cutoff = query
            .within_days
            .and_then(|days| days_before(now, days));
        let mut view = ActiveView::default();
        for contact in self.contacts.list_contacts()? {
            let entries = entries_by_contact.remove(&contact.id).unwrap_or_default();
            let insight = summarize(contact, &entries, now, &self.config, &self.scorer);
            match (insight.last_contact_date, cutoff) {
                (None, _) => view.never_contacted.push(insight),
                (Some(last), Some(cutoff)) if last < cutoff => view.dormant.push(insight),
                (Some(_), _) => view.recent.push(insight),
            }
        }

        for bucket in [&mut view.recent, &mut view.dormant] {
            bucket.sort_by(|left, right| {
                right
                    .last_contact_date
                    .cmp(&left.last_contact_date)
                    .then(left.contact.id.cmp(&right.contact.id))
            });
        }

        debug!(
            "event=active_view module=insights status=ok recent={} dormant={} never_contacted={}",
            view.recent.len(),
            view.dormant.len(),
            view.never_contacted.len()
        );
        Ok(view)
    }
}
