use std::path::Path;

use chrono::NaiveDate;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_LESSON_MINUTES, DEFAULT_MAX_LOGICAL_WEEK, DEFAULT_PRODID, DEFAULT_SLOT_TIMES,
    DEFAULT_TIMEZONE, SHORT_LESSON, SHORT_LESSON_MINUTES, STAGGER_KEYWORDS, STAGGERED_SLOT_TIMES,
};
use crate::error::CoreResult;
use crate::types::RestBreak;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub semester: SemesterConfig,
    #[serde(default)]
    pub lessons: LessonConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// IANA (or Windows) name of the institution's civic timezone.
    pub timezone: String,
    pub prodid: String,
    /// Display name written as `X-WR-CALNAME`.
    pub name: Option<String>,
    /// `LANGUAGE` parameter for event text, e.g. `zh-CN`.
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SemesterConfig {
    pub start: Option<NaiveDate>,
    pub rest_breaks: Vec<RestBreak>,
    pub max_logical_week: u32,
}

impl Default for SemesterConfig {
    fn default() -> Self {
        Self {
            start: None,
            rest_breaks: Vec::new(),
            max_logical_week: DEFAULT_MAX_LOGICAL_WEEK,
        }
    }
}

/// Lesson timetable of the institution.
///
/// Times are `HH:MM` strings; entry `i` belongs to lesson `i + 1`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    pub default: Vec<String>,
    pub staggered: Vec<String>,
    pub stagger_keywords: Vec<String>,
    pub default_minutes: i64,
    pub duration_overrides: Vec<DurationOverride>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct DurationOverride {
    pub lesson: u8,
    pub minutes: i64,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_SLOT_TIMES.iter().map(ToString::to_string).collect(),
            staggered: STAGGERED_SLOT_TIMES.iter().map(ToString::to_string).collect(),
            stagger_keywords: STAGGER_KEYWORDS.iter().map(ToString::to_string).collect(),
            default_minutes: DEFAULT_LESSON_MINUTES,
            duration_overrides: vec![DurationOverride {
                lesson: SHORT_LESSON,
                minutes: SHORT_LESSON_MINUTES,
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "timetable.ics".to_string(),
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, a config file and `COURSECAL__*`
    /// environment variables.
    /// Environment variables take precedence over file values.
    ///
    /// With `None` an optional `coursecal.toml` is read. An explicit file
    /// must exist.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load_from(file: Option<&Path>) -> CoreResult<Self> {
        let file_source = file.map_or_else(
            || config::File::with_name("coursecal").required(false),
            |path| config::File::from(path).required(true),
        );

        Ok(Self::builder()?
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix("COURSECAL")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?)
    }

    fn builder() -> CoreResult<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("calendar.timezone", DEFAULT_TIMEZONE)?
            .set_default("calendar.prodid", DEFAULT_PRODID)?
            .set_default(
                "semester.max_logical_week",
                i64::from(DEFAULT_MAX_LOGICAL_WEEK),
            )?
            .set_default("logging.level", "info")?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(file: Option<&Path>) -> CoreResult<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load_from(file)?;
    tracing::debug!(timezone = %settings.calendar.timezone, "Configuration loaded");
    Ok(settings)
}
