//! Timezone resolution and UTC conversion for lesson wall-clock times.
//!
//! Windows zone names and IANA aliases are canonicalized with ICU4X before
//! lookup in `chrono-tz`.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::collections::HashMap;
use std::str::FromStr;

/// Why a wall-clock time could not be placed on the UTC timeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Neither IANA, alias nor Windows name.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Skipped by a forward DST transition.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// Memoizing lookup from timezone identifier to `Tz`.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    cache: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Looks up `tzid`.
    ///
    /// IANA names are accepted directly; Windows names (`China Standard Time`)
    /// and legacy aliases (`PRC`, `Asia/Chongqing`) are mapped to their
    /// canonical IANA equivalents first.
    ///
    /// ## Errors
    ///
    /// Returns `ConversionError::UnknownTimezone` for an unrecognized name.
    ///
    /// ## Side Effects
    ///
    /// Remembers each identifier it resolves.
    pub fn resolve(&mut self, tzid: &str) -> Result<Tz, ConversionError> {
        if let Some(tz) = self.cache.get(tzid) {
            return Ok(*tz);
        }

        let tz = Tz::from_str(&canonical_name(tzid))
            .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))?;
        tracing::trace!(tzid, resolved = %tz, "Resolved timezone");

        self.cache.insert(tzid.to_string(), tz);

        Ok(tz)
    }
}

/// Canonical IANA name for `tzid`, or the trimmed input if ICU does not know it.
fn canonical_name(tzid: &str) -> String {
    let name = tzid.trim();
    let iana = IanaParserExtended::new();

    // Windows names map to a BCP-47 zone, which maps back to IANA.
    if let Some(zone) = WindowsParser::new().parse(name, None)
        && let Some(entry) = iana.iter().find(|entry| entry.time_zone == zone)
    {
        return entry.canonical.to_string();
    }

    // Asia/Chongqing, PRC -> Asia/Shanghai
    let parsed = iana.parse(name);
    if parsed.time_zone == icu::time::TimeZone::UNKNOWN {
        name.to_string()
    } else {
        parsed.canonical.to_string()
    }
}

/// ## Summary
/// Converts a local wall-clock time in `tz` to UTC.
///
/// A time inside a DST fold resolves to its first (earlier) occurrence.
///
/// ## Errors
///
/// Returns `ConversionError::NonExistentTime` if the local time falls in a
/// DST gap.
pub fn localize(local_time: NaiveDateTime, tz: &Tz) -> Result<DateTime<Utc>, ConversionError> {
    match tz.from_local_datetime(&local_time) {
        LocalResult::None => Err(ConversionError::NonExistentTime(format!(
            "{local_time} in timezone {tz}"
        ))),
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _latest) => Ok(earliest.with_timezone(&Utc)),
    }
}
