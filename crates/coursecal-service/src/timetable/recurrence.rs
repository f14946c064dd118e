//! Compression of an actual-week set into a weekly recurrence rule.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, Utc, Weekday};
use chrono_tz::Tz;
use coursecal_rfc::rfc::ical::core::format_utc_datetime;
use coursecal_rfc::rfc::ical::expand::localize;
use rrule::{RRule, Unvalidated};

use super::weeks::ActualWeekSet;
use crate::error::{CourseError, CourseResult, ServiceError, ServiceResult};

/// Weekly recurrence of one course: a start instant, a repeat count and the
/// occurrences to drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceDescriptor {
    /// Local weekday the course meets on.
    pub weekday: Weekday,
    /// First occurrence, in UTC.
    pub first_start: DateTime<Utc>,
    /// Number of weekly occurrences from `first_start`, exceptions included.
    pub weekly_repeat_count: u32,
    /// Occurrences inside the run that do not take place, ascending.
    pub exception_instants: Vec<DateTime<Utc>>,
}

impl RecurrenceDescriptor {
    /// Weekday of the first occurrence in UTC.
    ///
    /// DTSTART is written in UTC, so BYDAY must name the UTC weekday.
    #[must_use]
    pub fn byday(&self) -> Weekday {
        self.first_start.weekday()
    }

    /// `FREQ=WEEKLY;BYDAY=<dd>;COUNT=<n>`
    #[must_use]
    pub fn rrule_value(&self) -> String {
        format!(
            "FREQ=WEEKLY;BYDAY={};COUNT={}",
            byday_code(self.byday()),
            self.weekly_repeat_count
        )
    }

    /// Exception instants in `YYYYMMDDTHHMMSSZ` form.
    #[must_use]
    pub fn exdate_values(&self) -> Vec<String> {
        self.exception_instants
            .iter()
            .map(format_utc_datetime)
            .collect()
    }

    /// ## Summary
    /// Decodes the rule with the `rrule` crate and returns every occurrence
    /// that actually takes place.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` if the `rrule` crate rejects
    /// the generated rule.
    pub fn occurrences(&self) -> ServiceResult<Vec<DateTime<Utc>>> {
        let rrule = self
            .rrule_value()
            .parse::<RRule<Unvalidated>>()
            .map_err(|err| ServiceError::ValidationError(err.to_string()))?;
        let dt_start = self.first_start.with_timezone(&rrule::Tz::UTC);
        let mut rrule_set = rrule
            .build(dt_start)
            .map_err(|err| ServiceError::ValidationError(err.to_string()))?;

        if !self.exception_instants.is_empty() {
            let exdates: Vec<DateTime<rrule::Tz>> = self
                .exception_instants
                .iter()
                .map(|dt| dt.with_timezone(&rrule::Tz::UTC))
                .collect();
            rrule_set = rrule_set.set_exdates(exdates);
        }

        Ok(rrule_set
            .all(u16::MAX)
            .dates
            .into_iter()
            .map(|dt| dt.with_timezone(&Utc))
            .collect())
    }
}

/// Two-letter iCalendar weekday code.
#[must_use]
pub const fn byday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// ## Summary
/// Converts the timetable weekday index (1 = Monday .. 7 = Sunday).
///
/// ## Errors
/// Returns `CourseError::InvalidWeekday` outside `1..=7`.
pub fn weekday_from_index(index: u8) -> CourseResult<Weekday> {
    match index {
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        7 => Ok(Weekday::Sun),
        other => Err(CourseError::InvalidWeekday(other)),
    }
}

/// Places actual weeks on the calendar of one semester.
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceRuleBuilder {
    semester_start: NaiveDate,
    tz: Tz,
}

impl RecurrenceRuleBuilder {
    /// `semester_start` is the Monday of actual week 1 in `tz`.
    #[must_use]
    pub const fn new(semester_start: NaiveDate, tz: Tz) -> Self {
        Self { semester_start, tz }
    }

    /// ## Summary
    /// Local date of `weekday` in `actual_week`.
    ///
    /// ## Errors
    /// Returns `CourseError::DateOutOfRange` for week 0 or a date chrono
    /// cannot represent.
    pub fn occurrence_date(&self, actual_week: u32, weekday: Weekday) -> CourseResult<NaiveDate> {
        let out_of_range = CourseError::DateOutOfRange { week: actual_week };
        let weeks_in = actual_week.checked_sub(1).ok_or_else(|| out_of_range.clone())?;
        let days = u64::from(weeks_in) * 7 + u64::from(weekday.num_days_from_monday());
        self.semester_start
            .checked_add_days(Days::new(days))
            .ok_or(out_of_range)
    }

    /// ## Summary
    /// UTC instant of the occurrence in `actual_week`.
    ///
    /// ## Errors
    /// - `CourseError::DateOutOfRange` as for [`Self::occurrence_date`].
    /// - `CourseError::Timezone` if the wall-clock time falls in a DST gap.
    pub fn occurrence_start(
        &self,
        actual_week: u32,
        weekday: Weekday,
        start_time: NaiveTime,
    ) -> CourseResult<DateTime<Utc>> {
        let date = self.occurrence_date(actual_week, weekday)?;
        Ok(localize(date.and_time(start_time), &self.tz)?)
    }

    /// ## Summary
    /// Compresses `weeks` into one weekly rule.
    ///
    /// The rule repeats from the first to the last week; each hole in
    /// between becomes an exception instant at the lesson's start time.
    /// The rule is anchored in UTC, so every occurrence in the run must keep
    /// the first occurrence's UTC offset.
    ///
    /// ## Errors
    /// - `CourseError::EmptyWeekSet` if `weeks` is empty.
    /// - `CourseError::UtcOffsetChanges` if a week in the run falls on the
    ///   other side of a DST transition.
    /// - Errors of [`Self::occurrence_start`] for any week in the run.
    pub fn build(
        &self,
        weeks: &ActualWeekSet,
        weekday: Weekday,
        start_time: NaiveTime,
    ) -> CourseResult<RecurrenceDescriptor> {
        let (Some(first), Some(last)) = (weeks.first(), weeks.last()) else {
            return Err(CourseError::EmptyWeekSet);
        };

        let first_start = self.occurrence_start(first, weekday, start_time)?;
        let missing = weeks.missing_weeks();
        let mut exception_instants = Vec::with_capacity(missing.len());
        for week in first + 1..=last {
            let start = self.occurrence_start(week, weekday, start_time)?;
            let weekly = TimeDelta::try_weeks(i64::from(week - first))
                .and_then(|delta| first_start.checked_add_signed(delta));
            if weekly != Some(start) {
                return Err(CourseError::UtcOffsetChanges { week });
            }
            if missing.binary_search(&week).is_ok() {
                exception_instants.push(start);
            }
        }

        Ok(RecurrenceDescriptor {
            weekday,
            first_start,
            weekly_repeat_count: last - first + 1,
            exception_instants,
        })
    }
}
