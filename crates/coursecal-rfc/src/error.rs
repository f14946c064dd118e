use thiserror::Error;

use crate::rfc::ical::expand::ConversionError;

/// iCalendar building and timezone errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
