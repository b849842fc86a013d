//! Runtime config loader (strict parsing).

pub mod schema;

use std::fs;

use perftool_core::error::{PerfError, Result};

pub use schema::{ExportSection, InstrumentSection, LoggingSection, PerfConfig, WorkloadSection};

/// Used by the binary when no config path is given.
pub const DEFAULT_CONFIG: &str = r#"
version: 1
instruments:
  - label: "test"
    cycle_length: 10
    sub_cycle_length: 5
    rolling: true
    rolling_window: 30
    unit: ns
    clock: wall
  - label: "test-slave"
    derive_from: "test"
"#;

pub fn load_from_file(path: &str) -> Result<PerfConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PerfError::Io(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PerfConfig> {
    let cfg: PerfConfig = serde_yaml::from_str(s)
        .map_err(|e| PerfError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_default() -> Result<PerfConfig> {
    load_from_str(DEFAULT_CONFIG)
}
