//! Persistent export of full reports.
//!
//! Records are appended as one JSON object per line, values converted to the
//! instrument's display unit.

pub mod json;

pub use json::{ExportRecord, JsonLinesSink};
