//! Reading the course list and settling the semester for a run.

use std::path::Path;

use coursecal_core::config::Settings;
use coursecal_core::error::CoreError;
use coursecal_core::types::{
    CourseRow, RestBreak, Semester, decode_course_rows, parse_semester_date,
};
use coursecal_service::semester::{SemesterInfo, extract_semester_info};

use crate::cli::SemesterSource;
use crate::error::{AppError, AppResult};

fn read_file(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// ## Summary
/// Reads a JSON array of courses.
///
/// Rows that do not decode are kept as [`CourseRow::Malformed`] so the
/// assembler can report them in place.
///
/// ## Errors
/// Returns `AppError::Io` or `AppError::Json` if the file cannot be read or
/// is not a JSON array.
pub fn read_courses(path: &Path) -> AppResult<Vec<CourseRow>> {
    let raw = read_file(path)?;
    let rows = decode_course_rows(&raw).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count = rows.len(), "Read course list");
    Ok(rows)
}

/// ## Summary
/// Reads and extracts a semester-calendar document or a saved semester
/// page.
///
/// ## Errors
/// Returns `AppError::Io` if the file cannot be read, or the service error
/// if the document has no usable first teaching week.
pub fn read_semester_document(path: &Path) -> AppResult<SemesterInfo> {
    let raw = read_file(path)?;
    Ok(extract_semester_info(&raw)?)
}

/// ## Summary
/// Settles the semester from flags, the semester document and configuration.
///
/// For both the start date and the rest breaks, a flag wins over the
/// document, which wins over `semester.*` settings.
///
/// ## Errors
/// Returns `CoreError::InvalidInput` for a malformed flag,
/// `CoreError::ConfigError` if no source gives a start date, or the errors
/// of [`read_semester_document`].
pub fn resolve_semester(settings: &Settings, source: &SemesterSource) -> AppResult<Semester> {
    let document = source
        .semester_json
        .as_deref()
        .map(read_semester_document)
        .transpose()?;

    let start = if let Some(raw) = &source.semester_start {
        parse_semester_date(raw)?
    } else {
        document
            .as_ref()
            .map(|info| info.start)
            .or(settings.semester.start)
            .ok_or_else(|| {
                CoreError::ConfigError(
                    "no semester start: pass --semester-start, --semester-json or set semester.start"
                        .to_string(),
                )
            })?
    };

    let rest_breaks = if let Some(raw) = &source.rest {
        RestBreak::parse_pairs(raw)?
    } else {
        document.map_or_else(
            || settings.semester.rest_breaks.clone(),
            |info| info.rest_breaks,
        )
    };

    tracing::info!(%start, breaks = ?rest_breaks, "Semester settled");
    Ok(Semester::new(start, rest_breaks).with_max_logical_week(settings.semester.max_logical_week))
}
