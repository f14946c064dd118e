//! Per-course orchestration: time slot, weeks, recurrence, event.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use coursecal_core::config::Settings;
use coursecal_core::constants::UID_NAMESPACE;
use coursecal_core::types::{Course, CourseRow, Semester};
use coursecal_rfc::error::RfcError;
use coursecal_rfc::rfc::ical::expand::TimeZoneResolver;
use uuid::Uuid;

use super::recurrence::{RecurrenceDescriptor, RecurrenceRuleBuilder, weekday_from_index};
use super::time_slot::{LessonTable, TimeSlotResolver};
use super::week_map::WeekMapping;
use super::weeks::{expand, last_logical_week};
use crate::error::{CourseError, CourseResult, ServiceError, ServiceResult};

/// One calendar event, ready for the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    /// Stable identifier derived from the course identity.
    pub uid: Uuid,
    /// `"{name} - {teacher}"`
    pub title: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub recurrence: RecurrenceDescriptor,
}

/// A course that could not be placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCourse {
    /// Position in the input list.
    pub index: usize,
    pub name: String,
    pub reason: CourseError,
}

/// Result of one batch: events in input order plus the courses left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub events: Vec<EventDescriptor>,
    pub skipped: Vec<SkippedCourse>,
}

/// Turns a course list into calendar events for one semester.
#[derive(Debug, Clone)]
pub struct EventAssembler {
    semester: Semester,
    slots: TimeSlotResolver,
    tz: Tz,
}

impl EventAssembler {
    #[must_use]
    pub const fn new(semester: Semester, lessons: LessonTable, tz: Tz) -> Self {
        Self {
            semester,
            slots: TimeSlotResolver::new(lessons),
            tz,
        }
    }

    /// ## Summary
    /// Builds an assembler from loaded settings and the run's semester.
    ///
    /// ## Errors
    /// - `ServiceError::RfcError` if `calendar.timezone` does not resolve.
    /// - `ServiceError::InvalidConfiguration` for a bad `lessons` section.
    pub fn from_settings(settings: &Settings, semester: Semester) -> ServiceResult<Self> {
        let tz = TimeZoneResolver::new()
            .resolve(&settings.calendar.timezone)
            .map_err(RfcError::from)?;
        let lessons = LessonTable::from_config(&settings.lessons)?;
        Ok(Self::new(semester, lessons, tz))
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// ## Summary
    /// Assembles every course row into an event.
    ///
    /// The week mapping is built up to the largest logical week any
    /// well-formed course references. Malformed rows and courses that fail
    /// are reported in [`Assembly::skipped`] and the rest of the batch
    /// carries on.
    ///
    /// ## Errors
    /// - `ServiceError::EmptyCourseList` for an empty input.
    /// - `ServiceError::RangeExceeded` if a course references a week past
    ///   the semester's `max_logical_week`.
    /// - `ServiceError::InvalidConfiguration` for unusable rest breaks.
    #[tracing::instrument(skip_all, fields(rows = rows.len()))]
    pub fn assemble(&self, rows: &[CourseRow]) -> ServiceResult<Assembly> {
        if rows.is_empty() {
            return Err(ServiceError::EmptyCourseList);
        }

        let horizon = rows
            .iter()
            .filter_map(CourseRow::course)
            .filter_map(|course| last_logical_week(&course.weeks).ok())
            .max()
            .unwrap_or(0);
        let mapping = WeekMapping::build(
            &self.semester.rest_breaks,
            horizon,
            self.semester.max_logical_week,
        )?;

        Ok(self.assemble_with_mapping(rows, &mapping))
    }

    /// ## Summary
    /// Assembles every course row against a prebuilt mapping.
    ///
    /// Output keeps input order. Courses with identical identity get
    /// distinct UIDs, later ones salted with their position.
    #[must_use]
    pub fn assemble_with_mapping(&self, rows: &[CourseRow], mapping: &WeekMapping) -> Assembly {
        let builder = RecurrenceRuleBuilder::new(self.semester.start, self.tz);
        let mut assembly = Assembly::default();
        let mut seen_uids = HashSet::new();

        for (index, row) in rows.iter().enumerate() {
            let course = match row {
                CourseRow::Parsed(course) => course,
                CourseRow::Malformed { name, reason } => {
                    tracing::warn!(index, course = %name, %reason, "Skipping malformed row");
                    assembly.skipped.push(SkippedCourse {
                        index,
                        name: name.clone(),
                        reason: CourseError::MalformedRow(reason.clone()),
                    });
                    continue;
                }
            };

            match self.assemble_course(course, mapping, &builder) {
                Ok(mut event) => {
                    if !seen_uids.insert(event.uid) {
                        let salted = format!("{}#{index}", course.identity_key());
                        event.uid = Uuid::new_v5(&UID_NAMESPACE, salted.as_bytes());
                        seen_uids.insert(event.uid);
                    }
                    tracing::debug!(
                        index,
                        course = %course.name,
                        count = event.recurrence.weekly_repeat_count,
                        exceptions = event.recurrence.exception_instants.len(),
                        "Assembled course"
                    );
                    assembly.events.push(event);
                }
                Err(reason) => {
                    tracing::warn!(index, course = %course.name, %reason, "Skipping course");
                    assembly.skipped.push(SkippedCourse {
                        index,
                        name: course.name.clone(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            events = assembly.events.len(),
            skipped = assembly.skipped.len(),
            "Assembled timetable"
        );
        assembly
    }

    fn assemble_course(
        &self,
        course: &Course,
        mapping: &WeekMapping,
        builder: &RecurrenceRuleBuilder,
    ) -> CourseResult<EventDescriptor> {
        let weekday = weekday_from_index(course.time.weekday)?;
        let lesson = course.time.lesson;
        let start_time = self
            .slots
            .resolve(lesson, &course.location)
            .ok_or(CourseError::UnresolvedTimeSlot { lesson })?;
        let duration = self
            .slots
            .duration(lesson)
            .ok_or(CourseError::UnresolvedTimeSlot { lesson })?;

        let weeks = expand(&course.weeks, mapping)?;
        let recurrence = builder.build(&weeks, weekday, start_time)?;

        let start = recurrence.first_start;
        let end = start
            .checked_add_signed(duration)
            .ok_or(CourseError::DateOutOfRange {
                week: weeks.first().unwrap_or_default(),
            })?;

        Ok(EventDescriptor {
            uid: Uuid::new_v5(&UID_NAMESPACE, course.identity_key().as_bytes()),
            title: format!("{} - {}", course.name, course.teacher),
            location: course.location.clone(),
            start,
            end,
            recurrence,
        })
    }
}
