//! Correspondence repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/filtered-list over `correspondences`.
//! - Own tag-link persistence in `correspondence_tags`.
//!
//! # Invariants
//! - An entry and its tags are written in one transaction.
//! - An entry for a missing contact is rejected with `ContactNotFound` and
//!   leaves no row behind.
//! - Filtered listing is ordered by `sent_at DESC, id ASC`.
//! - Follow-up listing is ordered by `follow_up_date ASC, id ASC`.

use crate::model::contact::ContactId;
use crate::model::entry::{CorrespondenceEntry, DateRange, Direction, EntryId, NewEntry};
use crate::model::timestamp::{format_timestamp, parse_timestamp, Timestamp};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    contact_id,
    direction,
    sent_at,
    medium,
    subject,
    body,
    sentiment,
    related_topic,
    follow_up_date,
    response_status
FROM correspondences";

/// Recognized filters for entry listing. All fields are optional and combine
/// with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryListQuery {
    pub contact_id: Option<ContactId>,
    pub direction: Option<Direction>,
    pub date_range: Option<DateRange>,
}

impl EntryListQuery {
    /// Query restricted to one contact.
    pub fn for_contact(contact_id: ContactId) -> Self {
        Self {
            contact_id: Some(contact_id),
            ..Self::default()
        }
    }
}

/// Repository interface for correspondence records.
pub trait EntryRepository {
    fn create_entry(&self, entry: NewEntry) -> RepoResult<CorrespondenceEntry>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<CorrespondenceEntry>>;
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<CorrespondenceEntry>>;
    /// Entries carrying a follow-up date, most urgent first.
    fn list_follow_ups(&self) -> RepoResult<Vec<CorrespondenceEntry>>;
    fn update_response_status(&self, id: EntryId, status: &str) -> RepoResult<()>;
}

/// SQLite-backed correspondence repository.
#[derive(Clone, Copy)]
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Wraps a migrated connection from `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, entry: NewEntry) -> RepoResult<CorrespondenceEntry> {
        let entry = entry.normalized();
        let tx = self.conn.unchecked_transaction()?;

        if !contact_exists(&tx, entry.contact_id)? {
            return Err(RepoError::ContactNotFound(entry.contact_id));
        }

        tx.execute(
            "INSERT INTO correspondences (
                contact_id,
                direction,
                sent_at,
                medium,
                subject,
                body,
                sentiment,
                related_topic,
                follow_up_date,
                response_status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                entry.contact_id,
                entry.direction.as_str(),
                format_timestamp(&entry.timestamp),
                entry.medium.as_deref(),
                entry.subject.as_deref(),
                entry.body.as_deref(),
                entry.sentiment.as_deref(),
                entry.related_topic.as_deref(),
                entry.follow_up_date.as_ref().map(format_timestamp),
                entry.response_status.as_str(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        for tag in &entry.tags {
            tx.execute(
                "INSERT OR IGNORE INTO correspondence_tags (correspondence_id, tag)
                 VALUES (?1, ?2);",
                params![id, tag.as_str()],
            )?;
        }

        tx.commit()?;
        Ok(entry.into_entry(id))
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<CorrespondenceEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(self.conn, row)?));
        }

        Ok(None)
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<CorrespondenceEntry>> {
        let mut sql = format!("{ENTRY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(contact_id) = query.contact_id {
            sql.push_str(" AND contact_id = ?");
            bind_values.push(Value::Integer(contact_id));
        }

        if let Some(direction) = query.direction {
            sql.push_str(" AND direction = ?");
            bind_values.push(Value::Text(direction.as_str().to_string()));
        }

        if let Some(range) = query.date_range {
            if let Some(start) = range.start {
                sql.push_str(" AND sent_at >= ?");
                bind_values.push(Value::Text(format_timestamp(&start)));
            }
            if let Some(end) = range.end {
                sql.push_str(" AND sent_at <= ?");
                bind_values.push(Value::Text(format_timestamp(&end)));
            }
        }

        sql.push_str(" ORDER BY sent_at DESC, id ASC;");
        self.query_entries(&sql, bind_values)
    }

    fn list_follow_ups(&self) -> RepoResult<Vec<CorrespondenceEntry>> {
        self.query_entries(
            &format!(
                "{ENTRY_SELECT_SQL}
                 WHERE follow_up_date IS NOT NULL
                 ORDER BY follow_up_date ASC, id ASC;"
            ),
            Vec::new(),
        )
    }

    fn update_response_status(&self, id: EntryId, status: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE correspondences SET response_status = ?2 WHERE id = ?1;",
            params![id, status],
        )?;

        if changed == 0 {
            return Err(RepoError::EntryNotFound(id));
        }

        Ok(())
    }
}

impl SqliteEntryRepository<'_> {
    fn query_entries(
        &self,
        sql: &str,
        bind_values: Vec<Value>,
    ) -> RepoResult<Vec<CorrespondenceEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(self.conn, row)?);
        }
        Ok(entries)
    }
}

fn parse_entry_row(conn: &Connection, row: &Row<'_>) -> RepoResult<CorrespondenceEntry> {
    let id: EntryId = row.get("id")?;

    let direction_text: String = row.get("direction")?;
    let direction = direction_text.parse::<Direction>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid direction `{direction_text}` in correspondences.direction (id {id})"
        ))
    })?;

    let sent_at_text: String = row.get("sent_at")?;
    let timestamp = parse_stored_timestamp(&sent_at_text, "sent_at", id)?;

    let follow_up_date = match row.get::<_, Option<String>>("follow_up_date")? {
        Some(value) => Some(parse_stored_timestamp(&value, "follow_up_date", id)?),
        None => None,
    };

    Ok(CorrespondenceEntry {
        id,
        contact_id: row.get("contact_id")?,
        direction,
        timestamp,
        medium: row.get("medium")?,
        subject: row.get("subject")?,
        body: row.get("body")?,
        tags: load_tags_for_entry(conn, id)?,
        follow_up_date,
        sentiment: row.get("sentiment")?,
        related_topic: row.get("related_topic")?,
        response_status: row.get("response_status")?,
    })
}

fn parse_stored_timestamp(value: &str, column: &str, id: EntryId) -> RepoResult<Timestamp> {
    parse_timestamp(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{value}` in correspondences.{column} (id {id})"
        ))
    })
}

fn load_tags_for_entry(conn: &Connection, id: EntryId) -> RepoResult<BTreeSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM correspondence_tags
         WHERE correspondence_id = ?1;",
    )?;
    let tags = stmt
        .query_map([id], |row| row.get::<_, String>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(tags)
}

fn contact_exists(conn: &Connection, contact_id: ContactId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM contacts WHERE id = ?1);",
        [contact_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
