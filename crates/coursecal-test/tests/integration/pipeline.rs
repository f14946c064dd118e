//! Course list through the assembler, checked against decoded rules.

use chrono::{Datelike, TimeZone, Utc, Weekday};
use coursecal_core::types::{CourseRow, RestBreak};
use coursecal_service::error::CourseError;
use coursecal_service::timetable::{
    ActualWeekSet, EventDescriptor, RecurrenceRuleBuilder, WeekMapping, expand,
};
use coursecal_test::{institution_assembler, sample_courses, sample_rows, spring_2025};

fn weeks_of(event: &EventDescriptor) -> Vec<u32> {
    // Weeks since the semester start of every decoded occurrence.
    let start = Utc.with_ymd_and_hms(2025, 3, 2, 16, 0, 0).unwrap();
    event
        .recurrence
        .occurrences()
        .unwrap()
        .into_iter()
        .map(|occurrence| u32::try_from((occurrence - start).num_weeks()).unwrap() + 1)
        .collect()
}

#[test_log::test]
fn sample_timetable_without_breaks() {
    let assembly = institution_assembler(spring_2025(Vec::new()))
        .assemble(&sample_rows())
        .unwrap();

    assert!(assembly.skipped.is_empty());
    let [software, probability, discrete] = assembly.events.as_slice() else {
        panic!("expected three events, got {}", assembly.events.len());
    };

    assert_eq!(software.title, "软件工程 - 魏名元");
    assert_eq!(software.start, Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap());
    assert_eq!(software.recurrence.rrule_value(), "FREQ=WEEKLY;BYDAY=MO;COUNT=16");
    assert!(software.recurrence.exception_instants.is_empty());

    assert_eq!(probability.start, Utc.with_ymd_and_hms(2025, 3, 12, 2, 10, 0).unwrap());
    assert_eq!(probability.recurrence.weekly_repeat_count, 15);
    assert_eq!(probability.recurrence.exception_instants.len(), 7);
    assert_eq!(weeks_of(probability), vec![2, 4, 6, 8, 10, 12, 14, 16]);

    // 逸夫教学楼 is staggered, but only lesson 2 moves
    assert_eq!(discrete.start, Utc.with_ymd_and_hms(2025, 3, 14, 6, 10, 0).unwrap());
    assert_eq!(discrete.recurrence.rrule_value(), "FREQ=WEEKLY;BYDAY=FR;COUNT=15");
    assert_eq!(weeks_of(discrete), vec![2, 4, 6, 8, 10, 12, 14, 16]);
}

#[test_log::test]
fn sample_timetable_with_rest_week() {
    let assembly = institution_assembler(spring_2025(vec![RestBreak::new(3, 1)]))
        .assemble(&sample_rows())
        .unwrap();

    let software = &assembly.events[0];
    assert_eq!(software.recurrence.weekly_repeat_count, 17);
    assert!(software.recurrence.exception_instants.is_empty());
    assert_eq!(weeks_of(software), (1..=17).collect::<Vec<_>>());

    // Neither list course meets in logical week 3, so no rest week is added.
    for event in &assembly.events[1..] {
        assert_eq!(event.recurrence.weekly_repeat_count, 16);
        assert_eq!(event.recurrence.exception_instants.len(), 8);
        assert_eq!(weeks_of(event), vec![2, 5, 7, 9, 11, 13, 15, 17]);
    }
}

#[test]
fn exceptions_and_occurrences_partition_the_run() {
    let builder = RecurrenceRuleBuilder::new(
        spring_2025(Vec::new()).start,
        chrono_tz::Tz::Asia__Shanghai,
    );
    let mapping = WeekMapping::build(&[RestBreak::new(4, 2), RestBreak::new(9, 1)], 20, 100)
        .unwrap();
    let spec = coursecal_core::types::WeekSpec::Discontinuous(vec![1, 2, 4, 5, 9, 12, 20]);
    let weeks = expand(&spec, &mapping).unwrap();
    let rule = builder
        .build(&weeks, Weekday::Tue, chrono::NaiveTime::from_hms_opt(12, 10, 0).unwrap())
        .unwrap();

    let occurrences = rule.occurrences().unwrap();
    assert_eq!(occurrences.len(), weeks.len());
    assert_eq!(
        occurrences.len() + rule.exception_instants.len(),
        usize::try_from(rule.weekly_repeat_count).unwrap()
    );
    for occurrence in occurrences.iter().chain(&rule.exception_instants) {
        assert_eq!(occurrence.weekday(), Weekday::Tue);
        assert!(!rule.exception_instants.contains(occurrence) || !occurrences.contains(occurrence));
    }
}

#[test]
fn rest_week_is_not_appended_after_last_week() {
    let mapping = WeekMapping::build(&[RestBreak::new(3, 1)], 3, 100).unwrap();
    let weeks = expand(
        &coursecal_core::types::WeekSpec::Continuous { start: 1, end: 3 },
        &mapping,
    )
    .unwrap();
    assert_eq!(weeks, ActualWeekSet::from_weeks([1, 2, 3]));
}

#[test_log::test]
fn broken_rows_are_reported_not_fatal() {
    let mut courses = sample_courses();
    courses[1].time.lesson = 12;
    courses[2].weeks = coursecal_core::types::WeekSpec::Discontinuous(Vec::new());
    let rows: Vec<CourseRow> = courses.into_iter().map(CourseRow::from).collect();

    let assembly = institution_assembler(spring_2025(Vec::new()))
        .assemble(&rows)
        .unwrap();

    assert_eq!(assembly.events.len(), 1);
    assert_eq!(assembly.skipped.len(), 2);
    assert_eq!(assembly.skipped[0].index, 1);
    assert_eq!(
        assembly.skipped[0].reason,
        CourseError::UnresolvedTimeSlot { lesson: 12 }
    );
    assert_eq!(assembly.skipped[1].name, "离散数学（A）Ⅱ");
    assert_eq!(assembly.skipped[1].reason, CourseError::EmptyWeekSet);
}
