//! iCalendar core models (RFC 5545).
//!
//! These types only cover what the timetable export writes: a VCALENDAR
//! holding VEVENTs with text, UTC date-time and recurrence values.

mod component;
mod parameter;
mod property;
mod value;

pub use component::{Component, ComponentKind, ICalendar};
pub use parameter::Parameter;
pub use property::{Property, names};
pub use value::{UTC_DATETIME_FORMAT, Value, format_utc_datetime};
