//! Immutable per-instrument configuration.

use std::sync::Arc;

use crate::error::{PerfError, Result};
use crate::time::{ClockKind, DisplayUnit, DEFAULT_CYCLES_PER_NS};

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentConfig {
    /// Human-readable description used as the report label.
    pub label: Arc<str>,
    /// Samples per full reporting cycle.
    pub cycle_length: usize,
    /// Samples per online sub-report.
    pub sub_cycle_length: usize,
    /// Committed cycles retained in the rolling window (1 = non-rolling).
    pub window_batches: usize,
    pub clock: ClockKind,
    pub cycles_per_ns: f64,
    pub unit: DisplayUnit,
    /// Drop one min and one max value before mean/stddev.
    pub trim_extremes: bool,
}

impl InstrumentConfig {
    pub fn new(label: impl Into<Arc<str>>, cycle_length: usize, sub_cycle_length: usize) -> Self {
        Self {
            label: label.into(),
            cycle_length,
            sub_cycle_length,
            window_batches: 1,
            clock: ClockKind::Wall,
            cycles_per_ns: DEFAULT_CYCLES_PER_NS,
            unit: DisplayUnit::Ns,
            trim_extremes: false,
        }
    }

    pub fn with_window_batches(mut self, window_batches: usize) -> Self {
        self.window_batches = window_batches;
        self
    }

    /// Size the window by sample count, rounded up to whole cycles.
    /// `rolling = false` keeps a single batch.
    pub fn with_rolling_window(mut self, rolling: bool, samples: usize) -> Self {
        self.window_batches = window_batches_for(rolling, samples, self.cycle_length);
        self
    }

    pub fn with_clock(mut self, clock: ClockKind) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cycles_per_ns(mut self, cycles_per_ns: f64) -> Self {
        self.cycles_per_ns = cycles_per_ns;
        self
    }

    pub fn with_unit(mut self, unit: DisplayUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_trim_extremes(mut self, trim: bool) -> Self {
        self.trim_extremes = trim;
        self
    }

    /// Same settings under a new label.
    pub fn relabel(&self, label: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }

    /// Upper bound on retained samples.
    pub fn window_capacity(&self) -> usize {
        self.cycle_length.saturating_mul(self.window_batches)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cycle_length < 1 {
            return Err(PerfError::Misconfigured("cycle_length must be at least 1".into()));
        }
        if self.sub_cycle_length < 1 {
            return Err(PerfError::Misconfigured(
                "sub_cycle_length must be at least 1".into(),
            ));
        }
        if self.sub_cycle_length > self.cycle_length {
            return Err(PerfError::Misconfigured(format!(
                "sub_cycle_length ({}) must not exceed cycle_length ({})",
                self.sub_cycle_length, self.cycle_length
            )));
        }
        if self.window_batches < 1 {
            return Err(PerfError::Misconfigured(
                "window_batches must be at least 1".into(),
            ));
        }
        if !(self.cycles_per_ns.is_finite() && self.cycles_per_ns > 0.0) {
            return Err(PerfError::Misconfigured(format!(
                "cycles_per_ns must be positive and finite (got {})",
                self.cycles_per_ns
            )));
        }
        Ok(())
    }
}

/// `ceil(samples / cycle_length)` batches when rolling, otherwise one.
pub fn window_batches_for(rolling: bool, samples: usize, cycle_length: usize) -> usize {
    if !rolling || samples == 0 || cycle_length == 0 {
        return 1;
    }
    (samples - 1) / cycle_length + 1
}
