//! Report sink rendering `"<label> statistics"` + `"<metric>:<value><unit>"` lines.

use perftool_core::error::Result;
use perftool_core::report::{OnlineReport, ReportRecord, ReportSink};

/// Emits reports as `tracing` events at INFO.
#[derive(Debug, Clone)]
pub struct LogSink {
    online: bool,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LogSink {
    /// `online = false` suppresses sub-cycle reports.
    pub fn new(online: bool) -> Self {
        Self { online }
    }
}

/// Lines for a full report, header first.
pub fn full_lines(r: &ReportRecord) -> Vec<String> {
    let mut lines = Vec::with_capacity(9);
    lines.push(format!("{} statistics", r.label));
    for (name, v) in r.metrics() {
        lines.push(format!("{name}:{}", r.unit.render(v)));
    }
    lines.push(format!(
        "StdDev:{:.3}{}",
        r.unit.from_secs_f64(r.stddev_secs),
        r.unit.suffix()
    ));
    lines
}

/// Lines for an online (sub-cycle) report, header first.
pub fn online_lines(r: &OnlineReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);
    lines.push(format!("{} sub report statistics", r.label));
    for (name, v) in r.metrics() {
        lines.push(format!("{name}:{}", r.unit.render(v)));
    }
    lines
}

impl ReportSink for LogSink {
    fn full(&mut self, report: &ReportRecord) -> Result<()> {
        for line in full_lines(report) {
            tracing::info!(target: "perftool", samples = report.samples, "{line}");
        }
        Ok(())
    }

    fn online(&mut self, report: &OnlineReport) -> Result<()> {
        if !self.online {
            return Ok(());
        }
        for line in online_lines(report) {
            tracing::info!(target: "perftool", "{line}");
        }
        Ok(())
    }
}
