//! Content-line properties (RFC 5545 §3.1).

use chrono::{DateTime, Utc};

use super::value::format_utc_datetime;
use super::{Parameter, Value};

/// One content line: name, parameters and value.
///
/// `raw_value` is the wire form of every non-text value. Text values are
/// escaped by the serializer, so `raw_value` holds them unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Uppercased on construction.
    pub name: String,
    pub params: Vec<Parameter>,
    pub value: Value,
    pub raw_value: String,
}

impl Property {
    fn with_value(name: impl Into<String>, value: Value, raw_value: String) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value,
            raw_value,
        }
    }

    /// A TEXT property such as `SUMMARY`.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self::with_value(name, Value::Text(value.clone()), value)
    }

    /// A DATE-TIME property written in UTC form (`...Z`).
    #[must_use]
    pub fn utc_datetime(name: impl Into<String>, dt: DateTime<Utc>) -> Self {
        Self::with_value(name, Value::DateTime(dt), format_utc_datetime(&dt))
    }

    /// A RECUR property; `rule` is written as given.
    #[must_use]
    pub fn recur(name: impl Into<String>, rule: impl Into<String>) -> Self {
        let rule = rule.into();
        Self::with_value(name, Value::Recur(rule.clone()), rule)
    }

    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        self.params
            .iter()
            .find(|param| param.name.eq_ignore_ascii_case(name))
    }

    /// Adds `param`, dropping an earlier parameter of the same name.
    pub fn set_param(&mut self, param: Parameter) {
        self.params.retain(|existing| existing.name != param.name);
        self.params.push(param);
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        self.value.as_datetime()
    }
}

/// Names of the properties the export writes.
pub mod names {
    pub const VERSION: &str = "VERSION";
    pub const PRODID: &str = "PRODID";
    pub const CALSCALE: &str = "CALSCALE";
    pub const X_WR_CALNAME: &str = "X-WR-CALNAME";
    pub const X_WR_TIMEZONE: &str = "X-WR-TIMEZONE";

    pub const UID: &str = "UID";
    pub const DTSTAMP: &str = "DTSTAMP";
    pub const DTSTART: &str = "DTSTART";
    pub const DTEND: &str = "DTEND";
    pub const RRULE: &str = "RRULE";
    pub const EXDATE: &str = "EXDATE";
    pub const SUMMARY: &str = "SUMMARY";
    pub const LOCATION: &str = "LOCATION";

    /// Parameter carried by `SUMMARY` and `LOCATION` when a language is set.
    pub const LANGUAGE: &str = "LANGUAGE";
}
