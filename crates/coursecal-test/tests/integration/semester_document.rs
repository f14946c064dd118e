//! Semester-calendar document feeding the pipeline.

use chrono::{NaiveDate, TimeZone, Utc};
use coursecal_core::types::RestBreak;
use coursecal_service::semester::extract_semester_info;
use coursecal_test::{SAMPLE_SEMESTER_JSON, institution_assembler, sample_rows};

#[test]
fn sample_document_is_extracted() {
    let info = extract_semester_info(SAMPLE_SEMESTER_JSON).unwrap();
    assert_eq!(info.name, "2025-2026学年第一学期");
    assert_eq!(info.start, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    assert_eq!(info.rest_breaks, vec![RestBreak::new(4, 2)]);
}

#[test_log::test]
fn document_drives_the_assembler() {
    let semester = extract_semester_info(SAMPLE_SEMESTER_JSON)
        .unwrap()
        .into_semester(100);
    let assembly = institution_assembler(semester)
        .assemble(&sample_rows())
        .unwrap();

    let software = &assembly.events[0];
    assert_eq!(software.start, Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap());
    // 16 teaching weeks plus the two rest weeks it spans
    assert_eq!(software.recurrence.weekly_repeat_count, 18);
    assert!(software.recurrence.exception_instants.is_empty());
}
