use crate::error::Result;
use crate::time::{add_duration, scale_duration, Timestamp};

/// Coarse sub-cycle view: max/min/mean over the last `sub_cycle_length` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnlineSnapshot {
    pub max: Timestamp,
    pub min: Timestamp,
    pub mean: Timestamp,
    pub count: usize,
}

/// Running sum/max/min since the last reset.
#[derive(Debug, Clone)]
pub struct OnlineAccumulator {
    sum: Timestamp,
    max: Timestamp,
    min: Timestamp,
    count: usize,
}

impl Default for OnlineAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl OnlineAccumulator {
    pub fn new() -> Self {
        Self {
            sum: Timestamp::ZERO,
            max: Timestamp::ZERO,
            min: Timestamp::MAX,
            count: 0,
        }
    }

    #[inline]
    pub fn record(&mut self, sample: Timestamp) {
        self.sum = add_duration(self.sum, sample);
        if sample > self.max {
            self.max = sample;
        }
        if sample < self.min {
            self.min = sample;
        }
        self.count += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn sum(&self) -> Timestamp {
        self.sum
    }

    /// Mean is taken over `divisor` (the configured sub-cycle length), not `count`.
    pub fn snapshot(&self, divisor: usize) -> Result<OnlineSnapshot> {
        Ok(OnlineSnapshot {
            max: self.max,
            min: self.min,
            mean: scale_duration(self.sum, divisor as u64)?,
            count: self.count,
        })
    }
}
