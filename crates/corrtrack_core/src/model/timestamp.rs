//! Timestamp parsing and storage formatting.
//!
//! Timestamps are naive wall-clock values as entered by the user. Stored text
//! uses a fixed-width ISO-8601 layout so lexicographic order equals time
//! order.

use crate::model::validation::ValidationError;
use chrono::{NaiveDate, NaiveDateTime};

/// Point in time a message was exchanged or a follow-up is due.
pub type Timestamp = NaiveDateTime;

const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const ACCEPTED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses user-supplied timestamp text.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS[.fff]]`, a space instead of `T`, or a bare
/// `YYYY-MM-DD` (midnight).
///
/// # Errors
/// - `ValidationError::InvalidTimestamp` when no accepted layout matches.
pub fn parse_timestamp(value: &str) -> Result<Timestamp, ValidationError> {
    let trimmed = value.trim();
    for format in ACCEPTED_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }

    parse_date(trimmed)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ValidationError::InvalidTimestamp(value.to_string()))
}

/// Parses the inclusive upper bound of a date window.
///
/// Same layouts as `parse_timestamp`, except a bare `YYYY-MM-DD` covers the
/// whole day instead of stopping at midnight.
///
/// # Errors
/// - `ValidationError::InvalidTimestamp` when no accepted layout matches.
pub fn parse_range_end(value: &str) -> Result<Timestamp, ValidationError> {
    match parse_date(value.trim()) {
        Some(date) => date
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| ValidationError::InvalidTimestamp(value.to_string())),
        None => parse_timestamp(value),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Formats a timestamp for persistence.
pub fn format_timestamp(value: &Timestamp) -> String {
    value.format(STORAGE_FORMAT).to_string()
}
