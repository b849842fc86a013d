//! Split (seconds, nanoseconds) timestamp and its duration arithmetic.
//!
//! Rules:
//! - `nanos` is always normalized into `[0, 1e9)`; carries and borrows move into `secs`.
//! - Arithmetic is exposed as named pure functions, never as operators.
//! - Nothing here panics: overflowing seconds saturate.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{PerfError, Result};

/// Nanoseconds per second.
pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// An absolute point in time or, after subtraction, a non-negative duration.
///
/// Field order makes the derived `Ord` lexicographic on `(secs, nanos)`, which is
/// exactly [`compare_duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RawTimestamp")]
pub struct Timestamp {
    secs: i64,
    nanos: u32,
}

impl Timestamp {
    /// Zero duration.
    pub const ZERO: Timestamp = Timestamp { secs: 0, nanos: 0 };

    /// Largest representable value; used as the "+infinity" min sentinel.
    pub const MAX: Timestamp = Timestamp {
        secs: i64::MAX,
        nanos: NANOS_PER_SEC - 1,
    };

    /// Build from possibly unnormalized parts (`nanos` may be negative or >= 1e9).
    pub fn new(secs: i64, nanos: i64) -> Self {
        let per = i64::from(NANOS_PER_SEC);
        let carry = nanos.div_euclid(per);
        let nanos = nanos.rem_euclid(per);
        Self {
            secs: secs.saturating_add(carry),
            nanos: nanos as u32,
        }
    }

    /// Whole seconds, as used by the override path of `begin`/`end`.
    pub fn from_secs(secs: u64) -> Self {
        Self {
            secs: i64::try_from(secs).unwrap_or(i64::MAX),
            nanos: 0,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::from_total_nanos(i128::from(millis) * 1_000_000)
    }

    pub fn from_micros(micros: u64) -> Self {
        Self::from_total_nanos(i128::from(micros) * 1_000)
    }

    pub fn from_nanos(nanos: u64) -> Self {
        Self::from_total_nanos(i128::from(nanos))
    }

    /// Seconds component.
    pub fn secs(self) -> i64 {
        self.secs
    }

    /// Sub-second component in `[0, 1e9)`.
    pub fn subsec_nanos(self) -> u32 {
        self.nanos
    }

    /// Lossy conversion to floating-point seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.secs as f64 + f64::from(self.nanos) * 1e-9
    }

    /// Exact total nanoseconds.
    pub fn total_nanos(self) -> i128 {
        i128::from(self.secs) * i128::from(NANOS_PER_SEC) + i128::from(self.nanos)
    }

    /// Inverse of [`Timestamp::total_nanos`]; saturates outside the `i64` seconds range.
    pub fn from_total_nanos(total: i128) -> Self {
        let per = i128::from(NANOS_PER_SEC);
        let secs = total.div_euclid(per);
        let nanos = total.rem_euclid(per) as u32;
        match i64::try_from(secs) {
            Ok(secs) => Self { secs, nanos },
            Err(_) if secs < 0 => Self { secs: i64::MIN, nanos: 0 },
            Err(_) => Self::MAX,
        }
    }
}

/// Wire form; decoding goes through [`Timestamp::new`] so `nanos` is renormalized.
#[derive(Deserialize)]
struct RawTimestamp {
    secs: i64,
    nanos: i64,
}

impl From<RawTimestamp> for Timestamp {
    fn from(raw: RawTimestamp) -> Self {
        Timestamp::new(raw.secs, raw.nanos)
    }
}

/// `a + b` with nanosecond carry.
pub fn add_duration(a: Timestamp, b: Timestamp) -> Timestamp {
    let mut secs = a.secs.saturating_add(b.secs);
    let mut nanos = a.nanos + b.nanos;
    if nanos >= NANOS_PER_SEC {
        nanos -= NANOS_PER_SEC;
        secs = secs.saturating_add(1);
    }
    Timestamp { secs, nanos }
}

/// `a - b` with nanosecond borrow.
///
/// A negative result means the pair was recorded out of order and is rejected with
/// [`PerfError::InvalidOrder`]. Equal inputs yield [`Timestamp::ZERO`].
pub fn subtract_duration(a: Timestamp, b: Timestamp) -> Result<Timestamp> {
    let mut secs = a.secs.saturating_sub(b.secs);
    let nanos = if a.nanos >= b.nanos {
        a.nanos - b.nanos
    } else {
        secs = secs.saturating_sub(1);
        a.nanos + NANOS_PER_SEC - b.nanos
    };
    if secs < 0 {
        return Err(PerfError::InvalidOrder);
    }
    Ok(Timestamp { secs, nanos })
}

/// Lexicographic comparison on `(secs, nanos)`.
pub fn compare_duration(a: Timestamp, b: Timestamp) -> Ordering {
    a.secs.cmp(&b.secs).then(a.nanos.cmp(&b.nanos))
}

/// `a / n`, exact to the nanosecond (truncating).
///
/// Dividing by zero means averaging over nothing and is reported as
/// [`PerfError::NotReady`].
pub fn scale_duration(a: Timestamp, n: u64) -> Result<Timestamp> {
    if n == 0 {
        return Err(PerfError::NotReady);
    }
    Ok(Timestamp::from_total_nanos(a.total_nanos() / i128::from(n)))
}

/// Squared difference in f64 seconds.
///
/// Precision below the f64 mantissa is discarded, so this is only fit for variance
/// estimates and must never be used for ordering.
pub fn variance_term(a: Timestamp, mean: Timestamp) -> f64 {
    let d = (a.total_nanos() - mean.total_nanos()) as f64 * 1e-9;
    d * d
}
