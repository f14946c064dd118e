//! Timetable input types shared by every crate in the workspace.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_LOGICAL_WEEK;
use crate::error::{CoreError, CoreResult};

/// A run of rest weeks inserted after a logical teaching week.
///
/// `RestBreak { after_week: 3, length: 1 }` means logical week 4 starts one
/// calendar week later than it would without the break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RestBreak {
    /// Last logical week before the break.
    pub after_week: u32,
    /// Number of calendar weeks the break lasts.
    pub length: u32,
}

impl RestBreak {
    #[must_use]
    pub const fn new(after_week: u32, length: u32) -> Self {
        Self { after_week, length }
    }

    /// ## Summary
    /// Parses the flat pair-list form `after,length,after,length,...`.
    ///
    /// `"3,1,7,2"` yields breaks after week 3 (one week) and after week 7
    /// (two weeks). An empty or blank string yields no breaks. The result is
    /// sorted by `after_week`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if the list has an odd number of
    /// entries or an entry is not a positive integer.
    pub fn parse_pairs(input: &str) -> CoreResult<Vec<Self>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() % 2 != 0 {
            return Err(CoreError::InvalidInput(format!(
                "rest weeks must be given as after,length pairs, got {} values",
                parts.len()
            )));
        }

        let mut breaks = parts
            .chunks_exact(2)
            .map(|pair| Ok(Self::new(parse_positive(pair[0])?, parse_positive(pair[1])?)))
            .collect::<CoreResult<Vec<_>>>()?;
        breaks.sort_by_key(|b| b.after_week);
        Ok(breaks)
    }
}

fn parse_positive(raw: &str) -> CoreResult<u32> {
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(CoreError::InvalidInput(format!(
            "expected a positive week count, got {raw:?}"
        ))),
    }
}

/// Which logical teaching weeks a course meets in.
///
/// Serialized in the adjacently tagged form produced by the timetable
/// parser, e.g. `{"type": "continuous", "data": {"start": 1, "end": 16}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WeekSpec {
    /// Every week from `start` to `end`, inclusive.
    Continuous { start: u32, end: u32 },
    /// An explicit list of weeks.
    Discontinuous(Vec<u32>),
    /// `count` weeks starting at `start`, `interval` weeks apart.
    Interval { start: u32, interval: u32, count: u32 },
}

/// Weekday and lesson slot of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseTime {
    /// 1 = Monday .. 7 = Sunday.
    pub weekday: u8,
    /// Lesson slot index, 1-based.
    pub lesson: u8,
}

/// One row of the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub location: String,
    pub time: CourseTime,
    pub weeks: WeekSpec,
}

impl Course {
    /// ## Summary
    /// Stable identity string for this course slot.
    ///
    /// Two rows describing the same course at the same weekday, lesson and
    /// location produce the same key.
    #[must_use]
    pub fn identity_key(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.course_id.as_deref().unwrap_or_default(),
            self.class_id.as_deref().unwrap_or_default(),
            self.name,
            self.teacher,
            self.location,
            self.time.weekday,
            self.time.lesson,
        )
    }
}

/// One entry of a course file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseRow {
    Parsed(Course),
    /// A row that did not decode as a [`Course`]. `name` is empty when the
    /// row has no string `name` field.
    Malformed { name: String, reason: String },
}

impl CourseRow {
    #[must_use]
    pub const fn course(&self) -> Option<&Course> {
        match self {
            Self::Parsed(course) => Some(course),
            Self::Malformed { .. } => None,
        }
    }
}

impl From<Course> for CourseRow {
    fn from(course: Course) -> Self {
        Self::Parsed(course)
    }
}

/// ## Summary
/// Decodes a JSON array of courses one row at a time.
///
/// A row that does not decode is kept as [`CourseRow::Malformed`] in its
/// position, and the rows after it are still read.
///
/// ## Errors
/// Returns the `serde_json` error if the document is not a JSON array.
pub fn decode_course_rows(json: &str) -> Result<Vec<CourseRow>, serde_json::Error> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(rows.into_iter().map(decode_course_row).collect())
}

fn decode_course_row(row: serde_json::Value) -> CourseRow {
    let name = row
        .get("name")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();
    Course::deserialize(row).map_or_else(
        |err| CourseRow::Malformed {
            name,
            reason: err.to_string(),
        },
        CourseRow::Parsed,
    )
}

/// Facts about the term that every course is placed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Semester {
    /// Monday of logical week 1, local civic date.
    pub start: NaiveDate,
    /// Rest breaks, in any order.
    pub rest_breaks: Vec<RestBreak>,
    /// Largest logical week any course may reference.
    pub max_logical_week: u32,
}

impl Semester {
    #[must_use]
    pub fn new(start: NaiveDate, rest_breaks: Vec<RestBreak>) -> Self {
        Self {
            start,
            rest_breaks,
            max_logical_week: DEFAULT_MAX_LOGICAL_WEEK,
        }
    }

    #[must_use]
    pub fn with_max_logical_week(mut self, max_logical_week: u32) -> Self {
        self.max_logical_week = max_logical_week;
        self
    }
}

/// ## Summary
/// Parses a semester start date in `YYYYMMDD` or `YYYY-MM-DD` form.
///
/// ## Errors
/// Returns `CoreError::InvalidInput` if neither form matches.
pub fn parse_semester_date(raw: &str) -> CoreResult<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .or_else(|_err| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|err| CoreError::InvalidInput(format!("invalid semester date {raw:?}: {err}")))
}
