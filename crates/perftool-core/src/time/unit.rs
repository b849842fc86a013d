//! Display units for rendering and exporting durations.

use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// Display scale for reported durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Ns,
    Us,
    Ms,
    S,
}

impl DisplayUnit {
    /// Suffix appended to rendered values.
    pub fn suffix(self) -> &'static str {
        match self {
            DisplayUnit::Ns => "ns",
            DisplayUnit::Us => "us",
            DisplayUnit::Ms => "ms",
            DisplayUnit::S => "s",
        }
    }

    /// Nanoseconds per unit.
    pub fn scale(self) -> u64 {
        match self {
            DisplayUnit::Ns => 1,
            DisplayUnit::Us => 1_000,
            DisplayUnit::Ms => 1_000_000,
            DisplayUnit::S => 1_000_000_000,
        }
    }

    /// Express a duration in this unit.
    pub fn convert(self, ts: Timestamp) -> f64 {
        ts.total_nanos() as f64 / self.scale() as f64
    }

    /// Express a value given in f64 seconds (e.g. a standard deviation) in this unit.
    pub fn from_secs_f64(self, secs: f64) -> f64 {
        secs * 1e9 / self.scale() as f64
    }

    /// Render `value<suffix>`; nanoseconds print as integers, coarser units with three decimals.
    pub fn render(self, ts: Timestamp) -> String {
        match self {
            DisplayUnit::Ns => format!("{}{}", ts.total_nanos(), self.suffix()),
            _ => format!("{:.3}{}", self.convert(ts), self.suffix()),
        }
    }
}
