//! Clock sources feeding `begin`/`end`.
//!
//! Both reads are allocation-free and safe to call on the measured hot path.
//! The cycle-counter path is best-effort: it divides raw ticks by a fixed
//! cycles-per-nanosecond constant and is only as accurate as that constant.
//! Off x86_64 the raw source is monotonic nanoseconds, so pair it with
//! `cycles_per_ns = 1.0` there.

use std::sync::OnceLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// Default TSC scale (a 2 GHz invariant counter).
pub const DEFAULT_CYCLES_PER_NS: f64 = 2.0;

/// Fractional bits of the fixed-point nanoseconds-per-cycle scale.
const SCALE_SHIFT: u32 = 32;

/// Which source `begin`/`end` read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockKind {
    /// System clock, normalized to (seconds, nanoseconds).
    #[default]
    Wall,
    /// Raw hardware cycle counter scaled by `cycles_per_ns`.
    CycleCounter,
}

struct Source {
    clock: quanta::Clock,
    start: quanta::Instant,
    wall: Duration,
}

/// Process-wide source: one wall-clock read paired with a monotonic instant.
fn source() -> &'static Source {
    static SOURCE: OnceLock<Source> = OnceLock::new();
    SOURCE.get_or_init(|| {
        let clock = quanta::Clock::new();
        let start = clock.now();
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Source { clock, start, wall }
    })
}

/// Wall-clock read as `(seconds, nanoseconds)`.
///
/// The wall clock is sampled once per process; later reads advance it with the
/// monotonic clock so a measured interval can never run backwards.
#[inline]
pub fn read_wall_clock() -> (i64, u32) {
    let src = source();
    let now = src.wall + src.clock.now().duration_since(src.start);
    (
        i64::try_from(now.as_secs()).unwrap_or(i64::MAX),
        now.subsec_nanos(),
    )
}

/// Raw cycle count.
#[inline]
pub fn read_cycle_counter() -> u64 {
    source().clock.raw()
}

/// Nanoseconds per cycle as a Q32 fixed-point factor.
pub fn ns_per_cycle_q32(cycles_per_ns: f64) -> u64 {
    let scale = (1u64 << SCALE_SHIFT) as f64 / cycles_per_ns;
    // float-to-int casts saturate; NaN maps to 0
    scale.round() as u64
}

/// `cycles * scale >> 32` in 128-bit integers, so large counter values keep
/// nanosecond resolution.
#[inline]
pub fn scaled_cycles_to_timestamp(cycles: u64, scale_q32: u64) -> Timestamp {
    let nanos = (u128::from(cycles) * u128::from(scale_q32)) >> SCALE_SHIFT;
    Timestamp::from_total_nanos(nanos as i128)
}

/// Approximate a timestamp from a cycle count.
pub fn cycles_to_timestamp(cycles: u64, cycles_per_ns: f64) -> Timestamp {
    scaled_cycles_to_timestamp(cycles, ns_per_cycle_q32(cycles_per_ns))
}

/// A configured clock source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    kind: ClockKind,
    scale_q32: u64,
}

impl Clock {
    pub fn new(kind: ClockKind, cycles_per_ns: f64) -> Self {
        Self {
            kind,
            scale_q32: ns_per_cycle_q32(cycles_per_ns),
        }
    }

    pub fn kind(&self) -> ClockKind {
        self.kind
    }

    /// Read the configured source.
    #[inline]
    pub fn now(&self) -> Timestamp {
        match self.kind {
            ClockKind::Wall => {
                let (secs, nanos) = read_wall_clock();
                Timestamp::new(secs, i64::from(nanos))
            }
            ClockKind::CycleCounter => {
                scaled_cycles_to_timestamp(read_cycle_counter(), self.scale_q32)
            }
        }
    }

    /// Use `fixed` when supplied, otherwise read the live source.
    #[inline]
    pub fn now_or(&self, fixed: Option<Timestamp>) -> Timestamp {
        match fixed {
            Some(ts) => ts,
            None => self.now(),
        }
    }
}
