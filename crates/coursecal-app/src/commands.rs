//! Subcommand implementations. Each returns its result; `main` prints.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use coursecal_core::config::Settings;
use coursecal_service::calendar::{CalendarOptions, render};
use coursecal_service::semester::SemesterInfo;
use coursecal_service::timetable::{Assembly, EventAssembler};

use crate::cli::{GenerateArgs, PreviewArgs, SemesterArgs, SemesterSource};
use crate::error::{AppError, AppResult};
use crate::input::{read_courses, read_semester_document, resolve_semester};

/// What `generate` wrote.
#[derive(Debug)]
pub struct GenerateReport {
    pub path: PathBuf,
    pub assembly: Assembly,
}

impl GenerateReport {
    /// Human-readable summary, one line per skipped course.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Wrote {} event(s) to {}",
            self.assembly.events.len(),
            self.path.display()
        );
        for skipped in &self.assembly.skipped {
            out.push_str(&format!(
                "\nSkipped #{} {}: {}",
                skipped.index, skipped.name, skipped.reason
            ));
        }
        out
    }
}

fn assemble(
    settings: &Settings,
    courses_path: &Path,
    source: &SemesterSource,
) -> AppResult<(EventAssembler, Assembly)> {
    let rows = read_courses(courses_path)?;
    let semester = resolve_semester(settings, source)?;
    let assembler = EventAssembler::from_settings(settings, semester)?;
    let assembly = assembler.assemble(&rows)?;
    Ok((assembler, assembly))
}

/// ## Summary
/// Assembles the timetable and writes it as an `.ics` file.
///
/// `dtstamp` is written on every event.
///
/// ## Errors
/// Returns input, assembly or write errors; skipped courses are not errors.
#[tracing::instrument(skip_all, fields(courses = %args.courses.display()))]
pub fn generate(
    settings: &Settings,
    args: &GenerateArgs,
    dtstamp: DateTime<Utc>,
) -> AppResult<GenerateReport> {
    let (_, assembly) = assemble(settings, &args.courses, &args.semester)?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.output.path));
    let options = CalendarOptions::from_config(&settings.calendar, dtstamp);
    std::fs::write(&path, render(&assembly, &options)).map_err(|source| AppError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), "Calendar written");
    Ok(GenerateReport { path, assembly })
}

/// ## Summary
/// Lists every occurrence of every course in the civic timezone.
///
/// Occurrences are decoded from the generated rule, so the listing shows
/// what a calendar client will display.
///
/// ## Errors
/// Returns input or assembly errors, or a validation error if a generated
/// rule cannot be decoded.
pub fn preview(settings: &Settings, args: &PreviewArgs) -> AppResult<String> {
    let (assembler, assembly) = assemble(settings, &args.courses, &args.semester)?;
    let tz = assembler.timezone();

    let mut out = String::new();
    for event in &assembly.events {
        let occurrences = event.recurrence.occurrences()?;
        out.push_str(&format!(
            "{} @ {} ({} occurrence(s), {})\n",
            event.title,
            event.location,
            occurrences.len(),
            event.recurrence.rrule_value()
        ));
        for occurrence in occurrences {
            let local = occurrence.with_timezone(&tz);
            out.push_str(&format!("  {}\n", local.format("%Y-%m-%d %a %H:%M")));
        }
    }
    for skipped in &assembly.skipped {
        out.push_str(&format!(
            "skipped #{} {}: {}\n",
            skipped.index, skipped.name, skipped.reason
        ));
    }
    Ok(out)
}

/// ## Errors
/// Returns the errors of [`read_semester_document`].
pub fn semester(args: &SemesterArgs) -> AppResult<SemesterInfo> {
    read_semester_document(&args.semester_json)
}

/// One-line-per-fact rendering of a semester document.
#[must_use]
pub fn describe_semester(info: &SemesterInfo) -> String {
    let mut out = format!("{}\nstart: {}", info.name, info.start);
    if info.rest_breaks.is_empty() {
        out.push_str("\nno rest breaks");
    }
    for rest in &info.rest_breaks {
        out.push_str(&format!(
            "\nrest: {} week(s) after week {}",
            rest.length, rest.after_week
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use coursecal_core::types::RestBreak;
    use std::io::Write;

    const COURSES: &str = r#"[
        {
            "course_id": "M402004B", "class_id": "03", "name": "软件工程",
            "time": {"weekday": 1, "lesson": 1}, "teacher": "魏名元",
            "location": "逸夫教学楼 YF415",
            "weeks": {"type": "continuous", "data": {"start": 1, "end": 4}}
        },
        {
            "name": "坏课程", "time": {"weekday": 9, "lesson": 1},
            "weeks": {"type": "continuous", "data": {"start": 1, "end": 4}}
        },
        {
            "name": "离散数学", "time": {"weekday": 2, "lesson": 3},
            "weeks": {"type": "biweekly", "data": {}}
        }
    ]"#;

    fn settings() -> Settings {
        let mut settings = Settings::load_from(None).unwrap();
        settings.semester.start = NaiveDate::from_ymd_opt(2025, 3, 3);
        settings
    }

    fn courses_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(COURSES.as_bytes()).unwrap();
        file
    }

    #[test_log::test]
    fn generate_writes_calendar() {
        let courses = courses_file();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.ics");
        let args = GenerateArgs {
            courses: courses.path().to_path_buf(),
            output: Some(output.clone()),
            semester: SemesterSource::default(),
        };

        let dtstamp = Utc.with_ymd_and_hms(2025, 2, 20, 0, 0, 0).unwrap();
        let report = generate(&settings(), &args, dtstamp).unwrap();

        assert_eq!(report.assembly.events.len(), 1);
        assert_eq!(report.assembly.skipped.len(), 2);
        assert!(report.summary().contains("Skipped #1 坏课程"));
        assert!(report.summary().contains("Skipped #2 离散数学: malformed course row"));

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("RRULE:FREQ=WEEKLY;BYDAY=MO;COUNT=4\r\n"));
        assert!(written.contains("DTSTART:20250303T000000Z\r\n"));
        assert!(written.contains("DTSTAMP:20250220T000000Z\r\n"));
    }

    #[test]
    fn preview_lists_local_occurrences() {
        let courses = courses_file();
        let args = PreviewArgs {
            courses: courses.path().to_path_buf(),
            semester: SemesterSource {
                rest: Some("2,1".to_string()),
                ..SemesterSource::default()
            },
        };

        let out = preview(&settings(), &args).unwrap();

        assert!(out.contains("软件工程 - 魏名元 @ 逸夫教学楼 YF415 (5 occurrence(s)"));
        assert!(out.contains("  2025-03-03 Mon 08:00"));
        assert!(out.contains("  2025-03-17 Mon 08:00"));
        assert!(out.contains("  2025-03-31 Mon 08:00"));
        assert!(out.contains("skipped #1 坏课程"));
        assert!(out.contains("skipped #2 离散数学"));
    }

    #[test]
    fn describe_semester_lists_breaks() {
        let info = SemesterInfo {
            name: "2025-2026学年第一学期".to_string(),
            start: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            rest_breaks: vec![RestBreak::new(4, 2)],
        };
        let text = describe_semester(&info);
        assert!(text.contains("start: 2025-09-01"));
        assert!(text.contains("rest: 2 week(s) after week 4"));
    }
}
