//! Instrument: one measurement stream and its two-tier reporting state machine.
//!
//! Every `report` feeds one sample:
//! - the online accumulator, flushed as an online report each `sub_cycle_length` samples;
//! - the batch buffer, committed to the rolling window each `cycle_length` samples
//!   (or immediately on `force`) and summarized as a full report.
//!
//! `begin`/`end` only store a timestamp: no allocation, no I/O, no logging.
//! An instrument is single-owner (`&mut self`); give each thread its own, e.g. via
//! [`Instrument::derive`].

use std::sync::Arc;

use crate::config::InstrumentConfig;
use crate::error::{PerfError, Result};
use crate::report::{OnlineReport, ReportOutcome, ReportRecord, ReportSink};
use crate::stats::{BatchBuffer, OnlineAccumulator, RollingWindow};
use crate::time::{subtract_duration, Clock, Timestamp};

#[derive(Debug, Clone)]
pub struct Instrument {
    config: InstrumentConfig,
    clock: Clock,
    begin_time: Timestamp,
    end_time: Timestamp,
    online: OnlineAccumulator,
    batch: BatchBuffer,
    window: RollingWindow,
    sub_cycle_pos: usize,
    cycle_pos: usize,
}

impl Instrument {
    /// Validate `config` and allocate empty, pre-sized state.
    pub fn new(config: InstrumentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_validated(config))
    }

    fn with_validated(config: InstrumentConfig) -> Self {
        Self {
            clock: Clock::new(config.clock, config.cycles_per_ns),
            begin_time: Timestamp::ZERO,
            end_time: Timestamp::ZERO,
            online: OnlineAccumulator::new(),
            batch: BatchBuffer::with_capacity(config.cycle_length),
            window: RollingWindow::new(config.window_batches),
            sub_cycle_pos: 0,
            cycle_pos: 0,
            config,
        }
    }

    /// Slave instrument: same configuration by value, fresh independent state.
    pub fn derive(&self, label: impl Into<Arc<str>>) -> Instrument {
        Self::with_validated(self.config.relabel(label))
    }

    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    /// `(sub_cycle_pos, cycle_pos)`.
    pub fn positions(&self) -> (usize, usize) {
        (self.sub_cycle_pos, self.cycle_pos)
    }

    /// Samples recorded since the last commit.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    #[inline]
    pub fn begin(&mut self) {
        self.begin_time = self.clock.now();
    }

    #[inline]
    pub fn end(&mut self) {
        self.end_time = self.clock.now();
    }

    /// Override the begin timestamp (deterministic tests, replay).
    #[inline]
    pub fn begin_at(&mut self, ts: Timestamp) {
        self.begin_time = ts;
    }

    #[inline]
    pub fn end_at(&mut self, ts: Timestamp) {
        self.end_time = ts;
    }

    /// Record `end - begin` and advance the state machine.
    ///
    /// An out-of-order pair is rejected with [`PerfError::InvalidOrder`] and leaves all
    /// state untouched.
    pub fn report(&mut self, force: bool) -> Result<ReportOutcome> {
        let sample = subtract_duration(self.end_time, self.begin_time)?;
        self.record(sample, force)
    }

    /// [`Instrument::report`] followed by delivery to `sink`.
    pub fn report_into(&mut self, force: bool, sink: &mut dyn ReportSink) -> Result<ReportOutcome> {
        let outcome = self.report(force)?;
        outcome.deliver(sink)?;
        Ok(outcome)
    }

    /// Feed a precomputed sample.
    pub fn record(&mut self, sample: Timestamp, force: bool) -> Result<ReportOutcome> {
        self.online.record(sample);
        self.batch.push(sample);
        self.cycle_pos = (self.cycle_pos + 1) % self.config.cycle_length;
        self.sub_cycle_pos = (self.sub_cycle_pos + 1) % self.config.sub_cycle_length;

        let mut outcome = ReportOutcome::default();

        if force || self.cycle_pos == 0 {
            self.commit();
            outcome.full = Some(self.summary()?);
        }

        if self.sub_cycle_pos == 0 {
            let snap = self.online.snapshot(self.config.sub_cycle_length)?;
            outcome.online = Some(OnlineReport {
                label: Arc::clone(&self.config.label),
                unit: self.config.unit,
                count: snap.count,
                max: snap.max,
                min: snap.min,
                mean: snap.mean,
            });
            self.online.reset();
        }

        Ok(outcome)
    }

    /// Publish a partial cycle without recording a new sample.
    ///
    /// Returns `None` only when nothing was ever committed and nothing is pending.
    pub fn flush(&mut self) -> Result<Option<ReportRecord>> {
        if !self.batch.is_empty() {
            self.commit();
        }
        match self.summary() {
            Ok(record) => Ok(Some(record)),
            Err(PerfError::NotReady) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Move the batch into the window and realign the cycle counter.
    fn commit(&mut self) {
        let cap = self.config.cycle_length;
        let filled = self.batch.take(Vec::new());
        let committed = filled.len();
        // Evicted storage is recycled; fresh storage is only needed while the window fills.
        let storage = self
            .window
            .commit(filled)
            .unwrap_or_else(|| Vec::with_capacity(cap));
        self.batch.take(storage);
        self.cycle_pos = 0;
        tracing::debug!(
            label = %self.config.label,
            committed,
            window = self.window.len(),
            "batch committed"
        );
    }

    /// Full summary over the current window.
    pub fn summary(&self) -> Result<ReportRecord> {
        let w = &self.window;
        let trim = self.config.trim_extremes;
        Ok(ReportRecord {
            label: Arc::clone(&self.config.label),
            unit: self.config.unit,
            samples: w.len(),
            max: w.max()?,
            min: w.min()?,
            mean: w.mean(trim)?,
            stddev_secs: w.stddev(trim)?,
            p95: w.percentile(0.95)?,
            p75: w.percentile(0.75)?,
            p50: w.percentile(0.50)?,
            p25: w.percentile(0.25)?,
        })
    }
}
