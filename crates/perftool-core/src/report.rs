//! Report records and the sink boundary.
//!
//! The core builds records; sinks decide how they are rendered or persisted.
//! Nothing here depends on a serialization format.

use std::sync::Arc;

use crate::error::Result;
use crate::time::{DisplayUnit, Timestamp};

/// Full summary of the rolling window at a cycle boundary (or on force/flush).
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    pub label: Arc<str>,
    pub unit: DisplayUnit,
    /// Window cardinality the statistics were computed over.
    pub samples: usize,
    pub max: Timestamp,
    pub min: Timestamp,
    pub mean: Timestamp,
    /// Population standard deviation, f64 seconds.
    pub stddev_secs: f64,
    pub p95: Timestamp,
    pub p75: Timestamp,
    pub p50: Timestamp,
    pub p25: Timestamp,
}

impl ReportRecord {
    /// `(name, value)` pairs in emission order.
    pub fn metrics(&self) -> [(&'static str, Timestamp); 7] {
        [
            ("Max", self.max),
            ("Min", self.min),
            ("Mean", self.mean),
            ("95%", self.p95),
            ("75%", self.p75),
            ("50%", self.p50),
            ("25%", self.p25),
        ]
    }
}

/// Sub-cycle report from the online accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct OnlineReport {
    pub label: Arc<str>,
    pub unit: DisplayUnit,
    pub count: usize,
    pub max: Timestamp,
    pub min: Timestamp,
    pub mean: Timestamp,
}

impl OnlineReport {
    pub fn metrics(&self) -> [(&'static str, Timestamp); 3] {
        [("Max", self.max), ("Min", self.min), ("Mean", self.mean)]
    }
}

/// What a single `report` call produced. Either, both, or neither may be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOutcome {
    pub full: Option<ReportRecord>,
    pub online: Option<OnlineReport>,
}

impl ReportOutcome {
    pub fn is_empty(&self) -> bool {
        self.full.is_none() && self.online.is_none()
    }

    /// Hand the produced reports to `sink`, full report first.
    pub fn deliver(&self, sink: &mut dyn ReportSink) -> Result<()> {
        if let Some(full) = &self.full {
            sink.full(full)?;
        }
        if let Some(online) = &self.online {
            sink.online(online)?;
        }
        Ok(())
    }
}

/// External consumer of reports (log lines, JSON export, ...).
pub trait ReportSink {
    fn full(&mut self, report: &ReportRecord) -> Result<()>;

    /// Online reports are optional for a sink; ignored by default.
    fn online(&mut self, _report: &OnlineReport) -> Result<()> {
        Ok(())
    }
}

/// Collects reports in memory; handy for replay and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub full: Vec<ReportRecord>,
    pub online: Vec<OnlineReport>,
}

impl ReportSink for MemorySink {
    fn full(&mut self, report: &ReportRecord) -> Result<()> {
        self.full.push(report.clone());
        Ok(())
    }

    fn online(&mut self, report: &OnlineReport) -> Result<()> {
        self.online.push(report.clone());
        Ok(())
    }
}
