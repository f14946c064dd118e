//! iCalendar RFC 5545 output.
//!
//! - `core`: Type definitions for iCalendar structures
//! - `build`: Serializers for iCalendar content
//! - `expand`: Timezone resolution for local wall-clock times
//!
//! ## Example
//!
//! ```rust
//! use coursecal_rfc::rfc::ical::{build, core::*};
//!
//! let mut ical = ICalendar::new("-//My App//EN");
//! let mut event = Component::event();
//! event.add_property(Property::text("UID", "my-event-1"));
//! event.add_property(Property::text("SUMMARY", "Linear Algebra"));
//! ical.add_event(event);
//!
//! let output = build::serialize(&ical);
//! assert!(output.contains("SUMMARY:Linear Algebra\r\n"));
//! ```

pub mod build;
pub mod core;
pub mod expand;

pub use build::serialize;
pub use core::{Component, ComponentKind, ICalendar, Parameter, Property};
