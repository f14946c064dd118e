//! Lesson slot to wall-clock time resolution.

use std::collections::BTreeMap;

use chrono::{NaiveTime, TimeDelta};
use coursecal_core::config::LessonConfig;

use crate::error::{ServiceError, ServiceResult};

/// Immutable lesson timetable of the institution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonTable {
    default: BTreeMap<u8, NaiveTime>,
    staggered: BTreeMap<u8, NaiveTime>,
    stagger_keywords: Vec<String>,
    default_duration: TimeDelta,
    duration_overrides: BTreeMap<u8, TimeDelta>,
}

impl LessonTable {
    /// ## Summary
    /// Builds the table from the `lessons` configuration section.
    ///
    /// ## Errors
    /// Returns `ServiceError::InvalidConfiguration` if a start time is not
    /// `HH:MM`, a table has more than 255 entries, or a duration is not
    /// positive.
    pub fn from_config(config: &LessonConfig) -> ServiceResult<Self> {
        let duration_overrides = config
            .duration_overrides
            .iter()
            .map(|entry| Ok((entry.lesson, positive_minutes(entry.minutes)?)))
            .collect::<ServiceResult<BTreeMap<_, _>>>()?;

        Ok(Self {
            default: parse_slot_times(&config.default)?,
            staggered: parse_slot_times(&config.staggered)?,
            stagger_keywords: config
                .stagger_keywords
                .iter()
                .filter(|keyword| !keyword.is_empty())
                .cloned()
                .collect(),
            default_duration: positive_minutes(config.default_minutes)?,
            duration_overrides,
        })
    }

    /// ## Summary
    /// Institution defaults: seven lessons, a later lesson 2 in staggered
    /// buildings, 110-minute lessons and a 50-minute lesson 7.
    ///
    /// ## Errors
    /// Never fails for the built-in tables; the `Result` mirrors
    /// [`LessonTable::from_config`].
    pub fn institution_default() -> ServiceResult<Self> {
        Self::from_config(&LessonConfig::default())
    }
}

fn parse_slot_times(times: &[String]) -> ServiceResult<BTreeMap<u8, NaiveTime>> {
    times
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let lesson = u8::try_from(index + 1).map_err(|_e| {
                ServiceError::InvalidConfiguration(format!("too many lesson slots ({})", times.len()))
            })?;
            let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|err| {
                ServiceError::InvalidConfiguration(format!(
                    "lesson {lesson} start time {raw:?}: {err}"
                ))
            })?;
            Ok((lesson, time))
        })
        .collect()
}

fn positive_minutes(minutes: i64) -> ServiceResult<TimeDelta> {
    if minutes <= 0 {
        return Err(ServiceError::InvalidConfiguration(format!(
            "lesson duration must be positive, got {minutes} minutes"
        )));
    }
    TimeDelta::try_minutes(minutes).ok_or_else(|| {
        ServiceError::InvalidConfiguration(format!("lesson duration {minutes} minutes is too long"))
    })
}

/// Resolves lesson slots against a [`LessonTable`].
#[derive(Debug, Clone)]
pub struct TimeSlotResolver {
    table: LessonTable,
}

impl TimeSlotResolver {
    #[must_use]
    pub const fn new(table: LessonTable) -> Self {
        Self { table }
    }

    /// `true` if `location` names one of the staggered buildings.
    #[must_use]
    pub fn is_staggered(&self, location: &str) -> bool {
        self.table
            .stagger_keywords
            .iter()
            .any(|keyword| location.contains(keyword.as_str()))
    }

    /// ## Summary
    /// Start time of `lesson` for a course held at `location`.
    ///
    /// Staggered buildings use the staggered table, falling back to the
    /// default table for lessons it does not list.
    #[must_use]
    pub fn resolve(&self, lesson: u8, location: &str) -> Option<NaiveTime> {
        if self.is_staggered(location)
            && let Some(time) = self.table.staggered.get(&lesson)
        {
            return Some(*time);
        }
        self.table.default.get(&lesson).copied()
    }

    /// Length of `lesson`, or `None` for a lesson the timetable does not know.
    #[must_use]
    pub fn duration(&self, lesson: u8) -> Option<TimeDelta> {
        if !self.table.default.contains_key(&lesson) {
            return None;
        }
        Some(
            self.table
                .duration_overrides
                .get(&lesson)
                .copied()
                .unwrap_or(self.table.default_duration),
        )
    }
}
