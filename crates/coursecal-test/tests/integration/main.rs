#![expect(clippy::unwrap_used)]
//! End-to-end tests over the public crates: course list in, calendar out.

mod ics_output;
mod pipeline;
mod semester_document;
