//! The `generate` command writing real files.

use std::path::Path;

use chrono::{TimeZone, Utc};
use coursecal_app::cli::{GenerateArgs, SemesterSource};
use coursecal_app::commands::generate;
use coursecal_core::config::Settings;
use coursecal_rfc::rfc::ical::core::format_utc_datetime;
use coursecal_test::SAMPLE_COURSES_JSON;

fn settings() -> Settings {
    let mut settings = Settings::load_from(None).unwrap();
    settings.calendar.name = Some("2025 春季学期".to_string());
    settings
}

fn write_courses(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("courses.json");
    std::fs::write(&path, SAMPLE_COURSES_JSON).unwrap();
    path
}

fn generate_into(dir: &Path, name: &str, rest: Option<&str>) -> String {
    let args = GenerateArgs {
        courses: write_courses(dir),
        output: Some(dir.join(name)),
        semester: SemesterSource {
            semester_start: Some("2025-03-03".to_string()),
            rest: rest.map(ToString::to_string),
            semester_json: None,
        },
    };
    let dtstamp = Utc.with_ymd_and_hms(2025, 2, 28, 8, 0, 0).unwrap();
    let report = generate(&settings(), &args, dtstamp).unwrap();
    assert!(report.assembly.skipped.is_empty());
    std::fs::read_to_string(report.path).unwrap()
}

#[test_log::test]
fn written_file_is_well_formed() {
    let dir = tempfile::tempdir().unwrap();
    let ics = generate_into(dir.path(), "timetable.ics", Some("3,1"));

    assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
    assert!(ics.ends_with("END:VCALENDAR\r\n"));
    assert!(ics.contains("X-WR-CALNAME:2025 春季学期\r\n"));
    assert!(ics.contains("X-WR-TIMEZONE:Asia/Shanghai\r\n"));
    assert_eq!(ics.matches("BEGIN:VEVENT\r\n").count(), 3);
    assert_eq!(ics.matches("RRULE:").count(), 3);
    assert_eq!(ics.matches("EXDATE:").count(), 16);

    for line in ics.split_terminator("\r\n") {
        assert!(line.len() <= 75, "unfolded line: {line}");
        assert!(!line.contains('\n'), "bare LF in: {line:?}");
    }

    let first_exdate = Utc.with_ymd_and_hms(2025, 3, 19, 2, 10, 0).unwrap();
    assert!(ics.contains(&format!("EXDATE:{}\r\n", format_utc_datetime(&first_exdate))));
}

#[test]
fn events_follow_course_order() {
    let dir = tempfile::tempdir().unwrap();
    let ics = generate_into(dir.path(), "timetable.ics", None);

    let unfolded = ics.replace("\r\n ", "");
    let positions: Vec<usize> = ["软件工程", "概率论与数理统计(B)", "离散数学（A）Ⅱ"]
        .iter()
        .map(|name| unfolded.find(&format!("SUMMARY:{name}")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn regenerating_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = generate_into(dir.path(), "a.ics", Some("3,1"));
    let second = generate_into(dir.path(), "b.ics", Some("3,1"));
    assert_eq!(first, second);
    assert!(first.contains("@coursecal.local\r\n"));
}
