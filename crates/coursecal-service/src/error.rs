use coursecal_rfc::rfc::ical::expand::ConversionError;
use thiserror::Error;

/// Service layer errors that abort the whole run
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("logical week {horizon} is beyond the supported maximum of {max}")]
    RangeExceeded { horizon: u32, max: u32 },

    #[error("course list is empty")]
    EmptyCourseList,

    #[error(transparent)]
    RfcError(#[from] coursecal_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] coursecal_core::error::CoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Reasons a single course is left out of the calendar.
///
/// None of these stop the batch; the course is reported and skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CourseError {
    #[error("no start time for lesson {lesson}")]
    UnresolvedTimeSlot { lesson: u8 },

    #[error("week specification selects no weeks")]
    EmptyWeekSet,

    #[error("malformed week specification: {0}")]
    MalformedWeekSpec(String),

    #[error("weekday {0} is not in 1..=7")]
    InvalidWeekday(u8),

    #[error("actual week {week} falls outside the supported date range")]
    DateOutOfRange { week: u32 },

    #[error("UTC offset of the lesson changes at actual week {week}")]
    UtcOffsetChanges { week: u32 },

    #[error("malformed course row: {0}")]
    MalformedRow(String),

    #[error(transparent)]
    Timezone(#[from] ConversionError),
}

pub type CourseResult<T> = std::result::Result<T, CourseError>;
