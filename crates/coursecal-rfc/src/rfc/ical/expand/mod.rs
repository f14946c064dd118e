//! Local wall-clock time to UTC conversion.

mod timezone;

pub use timezone::{ConversionError, TimeZoneResolver, localize};
