//! Input validation errors shared by model constructors and services.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Malformed or missing required input. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Contact name is empty after trimming.
    EmptyName,
    /// Direction text is not `incoming` or `outgoing`.
    InvalidDirection(String),
    /// Timestamp text could not be parsed.
    InvalidTimestamp(String),
    /// Response status is empty after trimming.
    EmptyResponseStatus,
    /// Date range start is after its end.
    InvertedDateRange,
    /// A day count is below zero.
    NegativeDayCount { field: &'static str, value: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name cannot be empty"),
            Self::InvalidDirection(value) => write!(
                f,
                "invalid direction `{value}`; expected incoming|outgoing"
            ),
            Self::InvalidTimestamp(value) => write!(
                f,
                "invalid timestamp `{value}`; expected YYYY-MM-DDTHH:MM:SS"
            ),
            Self::EmptyResponseStatus => write!(f, "response status cannot be empty"),
            Self::InvertedDateRange => write!(f, "date range start must not be after its end"),
            Self::NegativeDayCount { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}
