//! Rolling window of committed batches with order-statistic queries.
//!
//! The window is a counted multiset (`BTreeMap<Timestamp, usize>`) over the union of
//! the last `max_batches` committed batches. The batches themselves are retained only
//! to know which values to remove when they age out.
//!
//! Eviction removes values, not insertions: when the same duration appears in two
//! batches, aging out either one removes one occurrence. Because equal durations are
//! indistinguishable in the multiset, the resulting contents are the same.

use std::collections::{BTreeMap, VecDeque};

use crate::error::{PerfError, Result};
use crate::time::{scale_duration, variance_term, Timestamp};

#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: BTreeMap<Timestamp, usize>,
    len: usize,
    batches: VecDeque<Vec<Timestamp>>,
    max_batches: usize,
}

impl RollingWindow {
    pub fn new(max_batches: usize) -> Self {
        let max_batches = max_batches.max(1);
        Self {
            values: BTreeMap::new(),
            len: 0,
            batches: VecDeque::with_capacity(max_batches + 1),
            max_batches,
        }
    }

    /// Insert a completed batch, first evicting the oldest one if the window is full.
    ///
    /// Returns the storage of the evicted batch so the caller can reuse it.
    pub fn commit(&mut self, batch: Vec<Timestamp>) -> Option<Vec<Timestamp>> {
        let aged = if self.batches.len() >= self.max_batches {
            self.batches.pop_front()
        } else {
            None
        };
        if let Some(aged) = &aged {
            self.evict(aged);
            tracing::trace!(evicted = aged.len(), "window batch aged out");
        }

        for &v in &batch {
            *self.values.entry(v).or_insert(0) += 1;
        }
        self.len += batch.len();
        self.batches.push_back(batch);
        aged
    }

    /// Remove one occurrence of each value in `aged`. Absent values are ignored.
    pub fn evict(&mut self, aged: &[Timestamp]) {
        for v in aged {
            let emptied = match self.values.get_mut(v) {
                Some(count) => {
                    *count -= 1;
                    self.len -= 1;
                    *count == 0
                }
                None => continue,
            };
            if emptied {
                self.values.remove(v);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of batches currently retained.
    pub fn batches(&self) -> usize {
        self.batches.len()
    }

    pub fn max_batches(&self) -> usize {
        self.max_batches
    }

    /// All values in ascending order, duplicates repeated.
    pub fn iter(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.values
            .iter()
            .flat_map(|(v, c)| std::iter::repeat(*v).take(*c))
    }

    pub fn max(&self) -> Result<Timestamp> {
        self.values
            .last_key_value()
            .map(|(v, _)| *v)
            .ok_or(PerfError::NotReady)
    }

    pub fn min(&self) -> Result<Timestamp> {
        self.values
            .first_key_value()
            .map(|(v, _)| *v)
            .ok_or(PerfError::NotReady)
    }

    /// Element at sorted index `k` (0-based).
    pub fn nth(&self, k: usize) -> Result<Timestamp> {
        let mut seen = 0usize;
        for (v, c) in &self.values {
            seen += c;
            if k < seen {
                return Ok(*v);
            }
        }
        Err(PerfError::NotReady)
    }

    /// Element at index `floor((len - 1) * p)`; `p = 0` is the min, `p = 1` the max.
    pub fn percentile(&self, p: f64) -> Result<Timestamp> {
        if !(0.0..=1.0).contains(&p) {
            return Err(PerfError::InvalidQuantile(p));
        }
        if self.is_empty() {
            return Err(PerfError::NotReady);
        }
        let idx = ((self.len - 1) as f64 * p).floor() as usize;
        self.nth(idx)
    }

    /// Sum and count, optionally excluding one smallest and one largest value.
    ///
    /// Trimming is skipped when two or fewer values are present.
    fn trimmed_sum(&self, trim: bool) -> Result<(i128, usize)> {
        if self.is_empty() {
            return Err(PerfError::NotReady);
        }
        let mut total: i128 = self
            .values
            .iter()
            .map(|(v, c)| v.total_nanos() * *c as i128)
            .sum();
        let mut n = self.len;
        if trim && n > 2 {
            total -= self.min()?.total_nanos() + self.max()?.total_nanos();
            n -= 2;
        }
        Ok((total, n))
    }

    pub fn mean(&self, trim: bool) -> Result<Timestamp> {
        let (total, n) = self.trimmed_sum(trim)?;
        scale_duration(Timestamp::from_total_nanos(total), n as u64)
    }

    /// Population standard deviation in seconds.
    pub fn stddev(&self, trim: bool) -> Result<f64> {
        let mean = self.mean(trim)?;
        let mut acc: f64 = self
            .values
            .iter()
            .map(|(v, c)| variance_term(*v, mean) * *c as f64)
            .sum();
        let mut n = self.len;
        if trim && n > 2 {
            acc -= variance_term(self.min()?, mean) + variance_term(self.max()?, mean);
            n -= 2;
        }
        Ok((acc.max(0.0) / n as f64).sqrt())
    }
}
