use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use perftool_core::error::{PerfError, Result};
use perftool_core::report::{ReportRecord, ReportSink};
use perftool_core::time::clock::read_wall_clock;
use perftool_core::time::DisplayUnit;

/// One exported line.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRecord<'a> {
    pub label: &'a str,
    pub unit: DisplayUnit,
    pub samples: usize,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub stddev: f64,
    pub p95: f64,
    pub p75: f64,
    pub p50: f64,
    pub p25: f64,
    /// Unix seconds at export time.
    pub emitted_at: i64,
}

impl<'a> ExportRecord<'a> {
    pub fn from_report(r: &'a ReportRecord) -> Self {
        let u = r.unit;
        Self {
            label: &r.label,
            unit: u,
            samples: r.samples,
            max: u.convert(r.max),
            min: u.convert(r.min),
            mean: u.convert(r.mean),
            stddev: u.from_secs_f64(r.stddev_secs),
            p95: u.convert(r.p95),
            p75: u.convert(r.p75),
            p50: u.convert(r.p50),
            p25: u.convert(r.p25),
            emitted_at: read_wall_clock().0,
        }
    }
}

/// Appends full reports to a JSON-lines file. Online reports are not exported.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &ExportRecord<'_>) -> Result<()> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| PerfError::Io(format!("json encode failed: {e}")))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PerfError::Io(format!("open {}: {e}", self.path.display())))?;
        file.write_all(line.as_bytes())
            .map_err(|e| PerfError::Io(format!("write {}: {e}", self.path.display())))
    }
}

impl ReportSink for JsonLinesSink {
    fn full(&mut self, report: &ReportRecord) -> Result<()> {
        self.append(&ExportRecord::from_report(report))
    }
}
