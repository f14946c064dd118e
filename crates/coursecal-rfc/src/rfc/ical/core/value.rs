//! iCalendar property values (RFC 5545 §3.3).

use chrono::{DateTime, Utc};

/// `strftime` pattern for UTC DATE-TIME values, e.g. `20250303T000000Z`.
pub const UTC_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Formats an instant as an iCalendar UTC DATE-TIME (`YYYYMMDDTHHMMSSZ`).
///
/// Sub-second precision is dropped.
#[must_use]
pub fn format_utc_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(UTC_DATETIME_FORMAT).to_string()
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// TEXT value, escaped on output.
    Text(String),
    /// DATE-TIME value in UTC.
    DateTime(DateTime<Utc>),
    /// RECUR value, already in `FREQ=...` form.
    Recur(String),
}

impl Value {
    /// Returns the value as text if it is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a datetime if it is a datetime value.
    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the rule text if it is a recurrence value.
    #[must_use]
    pub fn as_recur(&self) -> Option<&str> {
        match self {
            Self::Recur(rule) => Some(rule),
            _ => None,
        }
    }
}
