pub mod calendar;
pub mod error;
pub mod semester;
pub mod timetable;
