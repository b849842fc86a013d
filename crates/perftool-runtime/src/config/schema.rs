use std::collections::HashSet;
use std::path::PathBuf;

use perftool_core::config::window_batches_for;
use perftool_core::error::{PerfError, Result};
use perftool_core::time::{ClockKind, DisplayUnit, DEFAULT_CYCLES_PER_NS};
use perftool_core::InstrumentConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerfConfig {
    pub version: u32,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub export: ExportSection,

    #[serde(default)]
    pub workload: WorkloadSection,

    #[serde(default)]
    pub instruments: Vec<InstrumentSection>,
}

impl PerfConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PerfError::BadConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        if self.instruments.is_empty() {
            return Err(PerfError::BadConfig("instruments must not be empty".into()));
        }

        self.workload.validate()?;

        let mut seen = HashSet::new();
        let mut masters = HashSet::new();
        for inst in &self.instruments {
            if !seen.insert(inst.label.as_str()) {
                return Err(PerfError::BadConfig(format!(
                    "duplicate instrument label: {}",
                    inst.label
                )));
            }
            match &inst.derive_from {
                Some(master) => {
                    if !masters.contains(master.as_str()) {
                        return Err(PerfError::BadConfig(format!(
                            "instrument {} derives from {master}, which is not an earlier non-derived instrument",
                            inst.label
                        )));
                    }
                    inst.validate_derived()?;
                }
                None => {
                    inst.to_instrument_config()?.validate()?;
                    masters.insert(inst.label.as_str());
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Append log output to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Emit online (sub-cycle) reports as well as full reports.
    #[serde(default = "default_true")]
    pub online: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            file: None,
            online: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON-lines file full reports are appended to.
    #[serde(default = "default_export_path")]
    pub path: PathBuf,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_export_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadSection {
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Simulated work between `begin` and `end`.
    #[serde(default = "default_sleep_micros")]
    pub sleep_micros: u64,
}

impl Default for WorkloadSection {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            sleep_micros: default_sleep_micros(),
        }
    }
}

impl WorkloadSection {
    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(PerfError::BadConfig(
                "workload.iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstrumentSection {
    pub label: String,

    /// Derive a slave: copy the named instrument's settings, keep independent data.
    #[serde(default)]
    pub derive_from: Option<String>,

    #[serde(default)]
    pub cycle_length: Option<usize>,
    #[serde(default)]
    pub sub_cycle_length: Option<usize>,

    /// Explicit batch count; mutually exclusive with `rolling`/`rolling_window`.
    #[serde(default)]
    pub window_batches: Option<usize>,
    /// Defaults to `true` when `rolling_window` is set.
    #[serde(default)]
    pub rolling: Option<bool>,
    /// Window size in samples, rounded up to whole cycles.
    #[serde(default)]
    pub rolling_window: Option<usize>,

    #[serde(default)]
    pub unit: Option<DisplayUnit>,
    #[serde(default)]
    pub clock: Option<ClockKind>,
    #[serde(default)]
    pub cycles_per_ns: Option<f64>,
    #[serde(default)]
    pub trim_extremes: Option<bool>,
}

impl InstrumentSection {
    /// Derived entries inherit everything but the label.
    fn validate_derived(&self) -> Result<()> {
        let overrides = self.cycle_length.is_some()
            || self.sub_cycle_length.is_some()
            || self.window_batches.is_some()
            || self.rolling.is_some()
            || self.rolling_window.is_some()
            || self.unit.is_some()
            || self.clock.is_some()
            || self.cycles_per_ns.is_some()
            || self.trim_extremes.is_some();
        if overrides {
            return Err(PerfError::BadConfig(format!(
                "derived instrument {} must not set its own settings",
                self.label
            )));
        }
        Ok(())
    }

    /// Build the core config for a non-derived entry.
    pub fn to_instrument_config(&self) -> Result<InstrumentConfig> {
        let cycle_length = self.cycle_length.ok_or_else(|| {
            PerfError::BadConfig(format!("instrument {} requires cycle_length", self.label))
        })?;
        let sub_cycle_length = self.sub_cycle_length.unwrap_or(cycle_length);

        let window_batches = match (self.window_batches, self.rolling, self.rolling_window) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err(PerfError::BadConfig(format!(
                    "instrument {}: window_batches cannot be combined with rolling/rolling_window",
                    self.label
                )));
            }
            (Some(n), None, None) => n,
            (None, rolling, samples) => window_batches_for(
                rolling.unwrap_or(samples.is_some()),
                samples.unwrap_or(0),
                cycle_length,
            ),
        };

        Ok(InstrumentConfig::new(self.label.as_str(), cycle_length, sub_cycle_length)
            .with_window_batches(window_batches)
            .with_unit(self.unit.unwrap_or_default())
            .with_clock(self.clock.unwrap_or_default())
            .with_cycles_per_ns(self.cycles_per_ns.unwrap_or(DEFAULT_CYCLES_PER_NS))
            .with_trim_extremes(self.trim_extremes.unwrap_or(false)))
    }
}

fn default_filter() -> String {
    "info".into()
}
fn default_true() -> bool {
    true
}
fn default_export_path() -> PathBuf {
    PathBuf::from("perftool.json")
}
fn default_iterations() -> usize {
    100
}
fn default_sleep_micros() -> u64 {
    50
}
