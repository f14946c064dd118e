//! Semester facts from the institution's semester-calendar document.
//!
//! The document is a JSON array of `{"Id": .., "Json": [week, ...]}` where
//! each week carries a `Week` label (`第1教学周`, `休`, ...), the
//! `SemesterName` it belongs to and its Monday as `DT` in .NET form
//! (`/Date(1756656000000+0800)/`).
//!
//! The institution serves it percent-encoded in the `value` of a hidden
//! `<input id="hidJson">` on the semester page; a saved copy of that page is
//! accepted as well.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate};
use coursecal_core::types::{RestBreak, Semester};
use percent_encoding::percent_decode_str;
use regex_lite::Regex;
use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};

const FIRST_WEEK_LABEL: &str = "第1教学周";
const REST_LABEL: &str = "休";
const HIDDEN_JSON_ID: &str = "hidJson";

const INPUT_TAG: &str = r"(?is)<input\b[^>]*>";
const TAG_ATTRIBUTE: &str =
    r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#;

#[derive(Debug, Deserialize)]
struct SemesterEntry {
    #[serde(rename = "Json", default)]
    weeks: Option<Vec<WeekEntry>>,
}

#[derive(Debug, Deserialize)]
struct WeekEntry {
    #[serde(rename = "Week", default)]
    week: Option<String>,
    #[serde(rename = "SemesterName", default)]
    semester_name: Option<String>,
    #[serde(rename = "DT", default)]
    dt: Option<String>,
}

impl WeekEntry {
    fn label(&self) -> &str {
        self.week.as_deref().unwrap_or_default().trim()
    }

    fn semester_name(&self) -> &str {
        self.semester_name.as_deref().unwrap_or_default()
    }
}

/// Start date and rest breaks of one semester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterInfo {
    pub name: String,
    /// Monday of logical week 1.
    pub start: NaiveDate,
    /// Sorted by anchor, no duplicates.
    pub rest_breaks: Vec<RestBreak>,
}

impl SemesterInfo {
    #[must_use]
    pub fn into_semester(self, max_logical_week: u32) -> Semester {
        Semester::new(self.start, self.rest_breaks).with_max_logical_week(max_logical_week)
    }
}

/// ## Summary
/// Extracts the first semester that has a `第1教学周` entry.
///
/// `document` is either the JSON array or the semester page carrying it
/// (see [`semester_json`]). The entry's date becomes the semester start.
/// Scanning forward within the same semester, each run of `休` weeks becomes
/// a rest break anchored on the closest numbered teaching week before it.
///
/// ## Errors
/// Returns `ServiceError::ParseError` if the page has no `hidJson` value, the
/// document is not the expected JSON, or no semester has a dated first
/// teaching week.
#[tracing::instrument(skip_all)]
pub fn extract_semester_info(document: &str) -> ServiceResult<SemesterInfo> {
    let json = semester_json(document)?;
    let entries: Vec<SemesterEntry> = serde_json::from_str(&json)
        .map_err(|err| ServiceError::ParseError(format!("semester document: {err}")))?;

    for weeks in entries.iter().filter_map(|entry| entry.weeks.as_deref()) {
        let Some((first_index, start)) = find_first_week(weeks) else {
            continue;
        };
        let name = weeks[first_index].semester_name().to_string();
        let rest_breaks = collect_rest_breaks(&weeks[first_index..], &name);

        tracing::debug!(semester = %name, %start, breaks = ?rest_breaks, "Extracted semester");
        return Ok(SemesterInfo {
            name,
            start,
            rest_breaks,
        });
    }

    Err(ServiceError::ParseError(format!(
        "semester document has no dated {FIRST_WEEK_LABEL} entry"
    )))
}

/// ## Summary
/// Returns the semester-calendar JSON held by `document`.
///
/// A JSON array is returned unchanged. Anything else is read as the
/// semester page, and the `value` of its `<input id="hidJson">` is
/// percent-decoded. Invalid UTF-8 after decoding is replaced, not rejected.
///
/// ## Errors
/// Returns `ServiceError::ParseError` if the page has no `hidJson` input or
/// its value is empty.
pub fn semester_json(document: &str) -> ServiceResult<Cow<'_, str>> {
    if document.trim_start().starts_with('[') {
        return Ok(Cow::Borrowed(document));
    }

    let value = hidden_input_value(document, HIDDEN_JSON_ID)?
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            ServiceError::ParseError(format!(
                "semester page has no {HIDDEN_JSON_ID} input with a value"
            ))
        })?;
    tracing::debug!(encoded_len = value.len(), "Found semester JSON in page");
    Ok(percent_decode_str(value).decode_utf8_lossy())
}

/// `value` attribute of the first `<input>` whose `id` is `id`.
fn hidden_input_value<'a>(page: &'a str, id: &str) -> ServiceResult<Option<&'a str>> {
    let tags = Regex::new(INPUT_TAG)
        .map_err(|err| ServiceError::ParseError(format!("input tag pattern: {err}")))?;
    let attributes = Regex::new(TAG_ATTRIBUTE)
        .map_err(|err| ServiceError::ParseError(format!("attribute pattern: {err}")))?;

    for tag in tags.find_iter(page) {
        let mut tag_id = None;
        let mut value = None;
        for attribute in attributes.captures_iter(tag.as_str()) {
            let Some(name) = attribute.get(1) else {
                continue;
            };
            let text = attribute
                .get(2)
                .or_else(|| attribute.get(3))
                .or_else(|| attribute.get(4))
                .map_or("", |text| text.as_str());
            match name.as_str().to_ascii_lowercase().as_str() {
                "id" => tag_id = Some(text),
                "value" => value = Some(text),
                _ => {}
            }
        }
        if tag_id == Some(id) {
            return Ok(value);
        }
    }
    Ok(None)
}

fn find_first_week(weeks: &[WeekEntry]) -> Option<(usize, NaiveDate)> {
    weeks.iter().enumerate().find_map(|(index, week)| {
        if week.label() != FIRST_WEEK_LABEL || week.semester_name().is_empty() {
            return None;
        }
        let raw = week.dt.as_deref()?;
        match parse_dotnet_date(raw) {
            Ok(dt) => Some((index, dt.date_naive())),
            Err(err) => {
                tracing::warn!(dt = raw, %err, "Skipping first week with unreadable date");
                None
            }
        }
    })
}

fn collect_rest_breaks(weeks: &[WeekEntry], semester_name: &str) -> Vec<RestBreak> {
    let mut breaks = Vec::new();
    let mut last_teaching_week = None;
    let mut pending_rest: u32 = 0;

    let labels = weeks
        .iter()
        .take_while(|week| {
            let name = week.semester_name();
            name.is_empty() || name == semester_name
        })
        .map(|week| normalize_label(week.label()))
        .filter(|label| !label.is_empty());

    for label in labels {
        if label == REST_LABEL {
            pending_rest += 1;
            continue;
        }
        if pending_rest > 0
            && let Some(anchor) = last_teaching_week
        {
            breaks.push(RestBreak::new(anchor, pending_rest));
        }
        pending_rest = 0;
        if let Ok(week) = label.parse::<u32>() {
            last_teaching_week = Some(week);
        }
    }
    if pending_rest > 0
        && let Some(anchor) = last_teaching_week
    {
        breaks.push(RestBreak::new(anchor, pending_rest));
    }

    breaks.sort_unstable();
    breaks.dedup();
    breaks
}

/// `第12教学周` -> `12`; other labels pass through trimmed.
fn normalize_label(label: &str) -> &str {
    label
        .trim_matches('第')
        .trim_matches(|c: char| matches!(c, '教' | '学' | '周'))
        .trim()
}

/// ## Summary
/// Parses a .NET JSON date, `/Date(<millis>[±hhmm])/`.
///
/// Without an offset the instant is returned in UTC.
///
/// ## Errors
/// Returns `ServiceError::ParseError` for any other shape or an
/// out-of-range timestamp or offset.
pub fn parse_dotnet_date(raw: &str) -> ServiceResult<DateTime<FixedOffset>> {
    let invalid = || ServiceError::ParseError(format!("invalid .NET date {raw:?}"));

    let inner = raw
        .trim()
        .trim_matches('/')
        .strip_prefix("Date(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let (millis, offset) = inner
        .find(['+', '-'])
        .map_or((inner, ""), |split| inner.split_at(split));
    if millis.is_empty() || !millis.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let millis: i64 = millis.parse().map_err(|_e| invalid())?;

    let offset = if offset.is_empty() {
        FixedOffset::east_opt(0)
    } else {
        parse_offset(offset)
    }
    .ok_or_else(invalid)?;

    let instant = DateTime::from_timestamp_millis(millis).ok_or_else(invalid)?;
    Ok(instant.with_timezone(&offset))
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, digits) = raw.split_at_checked(1)?;
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    let seconds = hours * 3600 + minutes * 60;
    match sign {
        "+" => FixedOffset::east_opt(seconds),
        "-" => FixedOffset::west_opt(seconds),
        _ => None,
    }
}
