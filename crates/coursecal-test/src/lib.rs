//! coursecal integration test support.
//!
//! Fixtures shared by the integration tests: the sample timetable, a sample
//! semester-calendar document and ready-made assemblers.

use chrono::NaiveDate;
use chrono_tz::Tz;
use coursecal_core::types::{Course, CourseRow, RestBreak, Semester, decode_course_rows};
use coursecal_service::timetable::{EventAssembler, LessonTable};

/// Three courses covering every week specification form.
pub const SAMPLE_COURSES_JSON: &str = r#"[
    {
        "course_id": "M402004B",
        "class_id": "03",
        "name": "软件工程",
        "time": {"weekday": 1, "lesson": 1},
        "teacher": "魏名元",
        "location": "逸夫教学楼 YF415",
        "weeks": {"type": "continuous", "data": {"start": 1, "end": 16}}
    },
    {
        "course_id": "C108005B",
        "class_id": "02",
        "name": "概率论与数理统计(B)",
        "time": {"weekday": 3, "lesson": 2},
        "teacher": "刘玉婷",
        "location": "思源楼 SY207",
        "weeks": {"type": "discontinuous", "data": [2, 4, 6, 8, 10, 12, 14, 16]}
    },
    {
        "course_id": "M202006B",
        "class_id": "02",
        "name": "离散数学（A）Ⅱ",
        "time": {"weekday": 5, "lesson": 4},
        "teacher": "王奇志",
        "location": "逸夫教学楼 YF106",
        "weeks": {"type": "interval", "data": {"start": 2, "interval": 2, "count": 8}}
    }
]"#;

/// Autumn 2025 semester calendar: week 1 on 2025-09-01, two rest weeks
/// after week 4, then the spring semester.
pub const SAMPLE_SEMESTER_JSON: &str = r#"[
    {"Id": 7, "Json": [
        {"Week": "休", "SemesterName": "", "DT": "/Date(1756051200000+0800)/"},
        {"Week": "第1教学周", "SemesterName": "2025-2026学年第一学期", "DT": "/Date(1756656000000+0800)/"},
        {"Week": "第2教学周", "SemesterName": "2025-2026学年第一学期", "DT": "/Date(1757260800000+0800)/"},
        {"Week": "第3教学周", "SemesterName": "2025-2026学年第一学期", "DT": "/Date(1757865600000+0800)/"},
        {"Week": "第4教学周", "SemesterName": "2025-2026学年第一学期", "DT": "/Date(1758470400000+0800)/"},
        {"Week": "休", "SemesterName": "2025-2026学年第一学期", "DT": "/Date(1759075200000+0800)/"},
        {"Week": "休", "SemesterName": "2025-2026学年第一学期", "DT": "/Date(1759680000000+0800)/"},
        {"Week": "第5教学周", "SemesterName": "2025-2026学年第一学期", "DT": "/Date(1760284800000+0800)/"},
        {"Week": "第6教学周", "SemesterName": "2025-2026学年第一学期", "DT": "/Date(1760889600000+0800)/"},
        {"Week": "第1教学周", "SemesterName": "2025-2026学年第二学期", "DT": "/Date(1771776000000+0800)/"},
        {"Week": "休", "SemesterName": "2025-2026学年第二学期", "DT": ""}
    ]}
]"#;

/// ## Summary
/// Parses [`SAMPLE_COURSES_JSON`].
///
/// ## Panics
/// Panics if the fixture no longer matches the course schema.
#[must_use]
#[expect(clippy::expect_used)]
pub fn sample_courses() -> Vec<Course> {
    serde_json::from_str(SAMPLE_COURSES_JSON).expect("sample courses fixture is valid")
}

/// ## Summary
/// Decodes [`SAMPLE_COURSES_JSON`] the way a course file is read.
///
/// ## Panics
/// Panics if the fixture is not a JSON array.
#[must_use]
#[expect(clippy::expect_used)]
pub fn sample_rows() -> Vec<CourseRow> {
    decode_course_rows(SAMPLE_COURSES_JSON).expect("sample courses fixture is an array")
}

/// ## Summary
/// Spring 2025: week 1 starts Monday 2025-03-03.
///
/// ## Panics
/// Never in practice; the date is a constant.
#[must_use]
#[expect(clippy::expect_used)]
pub fn spring_2025(rest_breaks: Vec<RestBreak>) -> Semester {
    let start = NaiveDate::from_ymd_opt(2025, 3, 3).expect("valid date");
    Semester::new(start, rest_breaks)
}

/// ## Summary
/// Assembler with the institution's lesson table in `Asia/Shanghai`.
///
/// ## Panics
/// Panics if the built-in lesson table fails to parse.
#[must_use]
#[expect(clippy::expect_used)]
pub fn institution_assembler(semester: Semester) -> EventAssembler {
    let lessons = LessonTable::institution_default().expect("built-in lesson table");
    EventAssembler::new(semester, lessons, Tz::Asia__Shanghai)
}
