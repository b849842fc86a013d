use crate::time::Timestamp;

/// Samples of the cycle currently being filled.
///
/// Storage is pre-sized to the cycle length; `take` hands the filled storage to the
/// window and installs recycled storage in its place.
#[derive(Debug, Clone)]
pub struct BatchBuffer {
    samples: Vec<Timestamp>,
    capacity: usize,
}

impl BatchBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample. Returns `false` (and drops it) when the cycle is already full.
    #[inline]
    pub fn push(&mut self, sample: Timestamp) -> bool {
        if self.samples.len() >= self.capacity {
            return false;
        }
        self.samples.push(sample);
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[Timestamp] {
        &self.samples
    }

    /// Swap out the filled samples, installing `spare` (cleared) as the new storage.
    pub fn take(&mut self, mut spare: Vec<Timestamp>) -> Vec<Timestamp> {
        spare.clear();
        std::mem::replace(&mut self.samples, spare)
    }
}
