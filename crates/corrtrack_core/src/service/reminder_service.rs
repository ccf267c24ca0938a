//! Follow-up reminder derivation.
//!
//! # Responsibility
//! - Derive pending/overdue follow-ups from entries carrying a follow-up
//!   date, relative to a caller-supplied reference time.
//!
//! # Invariants
//! - Stateless: nothing is persisted and no follow-up is ever resolved
//!   automatically. Status is re-derived on every call.
//! - `response_status` is not consulted.
//! - Output is ordered by `follow_up_date ASC, entry id ASC`.
//! - Overdue means `follow_up_date < now`; the day delta of an overdue
//!   reminder is always negative.

use crate::model::contact::{Contact, ContactId};
use crate::model::entry::CorrespondenceEntry;
use crate::model::timestamp::Timestamp;
use crate::repo::contact_repo::ContactRepository;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::error::RepoResult;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;

const SECONDS_PER_DAY: i64 = 86_400;

/// Derived state of one follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    /// Due date is at or after the reference time.
    Pending,
    /// Due date is before the reference time.
    Overdue,
}

/// One outstanding follow-up with its contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub entry: CorrespondenceEntry,
    pub contact: Contact,
    pub status: ReminderStatus,
    /// Whole days from `now` to the due date, floored. Negative when overdue.
    pub days_until_due: i64,
}

impl Reminder {
    pub fn due(&self) -> Option<Timestamp> {
        self.entry.follow_up_date
    }
}

/// Reminder listing options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderQuery {
    /// Restrict output to overdue reminders.
    pub overdue_only: bool,
}

impl ReminderQuery {
    pub fn overdue_only() -> Self {
        Self { overdue_only: true }
    }

    /// Applies the restriction to already-derived reminders.
    ///
    /// Idempotent: applying it to its own output changes nothing.
    pub fn apply(&self, reminders: Vec<Reminder>) -> Vec<Reminder> {
        if !self.overdue_only {
            return reminders;
        }
        reminders
            .into_iter()
            .filter(|reminder| reminder.status == ReminderStatus::Overdue)
            .collect()
    }
}

/// Classifies a due date against the reference time.
///
/// Returns the status and the signed whole-day delta (floored), so a
/// follow-up two hours overdue reports `-1`.
pub fn classify(follow_up_date: Timestamp, now: Timestamp) -> (ReminderStatus, i64) {
    let status = if follow_up_date < now {
        ReminderStatus::Overdue
    } else {
        ReminderStatus::Pending
    };
    let delta_days = (follow_up_date - now)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY);
    (status, delta_days)
}

/// Builds sorted reminders from follow-up entries and a contact lookup.
///
/// Entries without a follow-up date are skipped. Entries whose contact is
/// missing from `contacts` are skipped with a warning.
pub fn derive_reminders(
    entries: Vec<CorrespondenceEntry>,
    contacts: &HashMap<ContactId, Contact>,
    now: Timestamp,
    query: &ReminderQuery,
) -> Vec<Reminder> {
    let mut reminders = Vec::new();
    for entry in entries {
        let Some(due) = entry.follow_up_date else {
            continue;
        };
        let Some(contact) = contacts.get(&entry.contact_id) else {
            warn!(
                "event=reminder_derive module=reminders status=skipped entry_id={} contact_id={} error_code=contact_missing",
                entry.id, entry.contact_id
            );
            continue;
        };

        let (status, days_until_due) = classify(due, now);
        reminders.push(Reminder {
            entry,
            contact: contact.clone(),
            status,
            days_until_due,
        });
    }

    reminders.sort_by(|left, right| {
        left.entry
            .follow_up_date
            .cmp(&right.entry.follow_up_date)
            .then(left.entry.id.cmp(&right.entry.id))
    });
    query.apply(reminders)
}

/// Derives outstanding follow-ups from the correspondence log.
pub struct ReminderEngine<C: ContactRepository, E: EntryRepository> {
    contacts: C,
    entries: E,
}

impl<C: ContactRepository, E: EntryRepository> ReminderEngine<C, E> {
    pub fn new(contacts: C, entries: E) -> Self {
        Self { contacts, entries }
    }

    /// Returns follow-ups as of `now`, most urgent first.
    pub fn reminders(&self, now: Timestamp, query: &ReminderQuery) -> RepoResult<Vec<Reminder>> {
        let follow_ups = self.entries.list_follow_ups()?;
        let contacts = self
            .contacts
            .list_contacts()?
            .into_iter()
            .map(|contact| (contact.id, contact))
            .collect::<HashMap<_, _>>();

        let reminders = derive_reminders(follow_ups, &contacts, now, query);
        debug!(
            "event=reminder_derive module=reminders status=ok count={} overdue_only={}",
            reminders.len(),
            query.overdue_only
        );
        Ok(reminders)
    }
}
