//! perftool core: latency measurement and aggregation primitives.
//!
//! This crate holds the measurement engine: split-timestamp arithmetic, clock
//! sources, the online accumulator, the rolling order-statistics window and the
//! two-tier reporting state machine behind [`Instrument`]. It carries no runtime,
//! logging-backend or serialization-format dependencies; reports leave through the
//! [`report::ReportSink`] trait.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Misuse such as out-of-order timestamps or queries on an empty window surfaces
//! as `PerfError`/`Result` so an instrumented process is never brought down by
//! its own instrumentation.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;
pub mod instrument;
pub mod report;
pub mod stats;
pub mod time;

pub use config::InstrumentConfig;
/// Shared result type.
pub use error::{ErrorCode, PerfError, Result};
pub use instrument::Instrument;
pub use report::{MemorySink, OnlineReport, ReportOutcome, ReportRecord, ReportSink};
pub use time::{ClockKind, DisplayUnit, Timestamp};
