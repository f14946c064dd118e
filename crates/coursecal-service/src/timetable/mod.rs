//! Timetable to recurrence engine.
//!
//! - `week_map`: logical to actual week mapping around rest breaks
//! - `weeks`: expansion of a course's week specification
//! - `time_slot`: lesson start times and durations
//! - `recurrence`: compression into a weekly rule plus exceptions
//! - `assembler`: per-course orchestration into calendar events

pub mod assembler;
pub mod recurrence;
pub mod time_slot;
pub mod week_map;
pub mod weeks;

pub use assembler::{Assembly, EventAssembler, EventDescriptor, SkippedCourse};
pub use recurrence::{RecurrenceDescriptor, RecurrenceRuleBuilder};
pub use time_slot::{LessonTable, TimeSlotResolver};
pub use week_map::WeekMapping;
pub use weeks::{ActualWeekSet, expand};
