//! Time primitives: the split timestamp, its arithmetic, clock sources and display units.

pub mod clock;
pub mod timestamp;
pub mod unit;

pub use clock::{Clock, ClockKind, DEFAULT_CYCLES_PER_NS};
pub use timestamp::{
    add_duration, compare_duration, scale_duration, subtract_duration, variance_term, Timestamp,
    NANOS_PER_SEC,
};
pub use unit::DisplayUnit;
