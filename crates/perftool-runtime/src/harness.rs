//! Harness: instruments built from config plus the sinks their reports go to.
//!
//! Construction returns `Result` so the binary can fail gracefully on a bad
//! config instead of panicking.

use std::collections::HashMap;

use perftool_core::error::{PerfError, Result};
use perftool_core::report::{OnlineReport, ReportOutcome, ReportRecord, ReportSink};
use perftool_core::Instrument;

use crate::config::PerfConfig;
use crate::export::JsonLinesSink;
use crate::obs::LogSink;

/// Forwards every report to each sink in order; stops at the first error.
#[derive(Default)]
pub struct FanOut {
    sinks: Vec<Box<dyn ReportSink + Send>>,
}

impl FanOut {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn push(&mut self, sink: Box<dyn ReportSink + Send>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ReportSink for FanOut {
    fn full(&mut self, report: &ReportRecord) -> Result<()> {
        for s in &mut self.sinks {
            s.full(report)?;
        }
        Ok(())
    }

    fn online(&mut self, report: &OnlineReport) -> Result<()> {
        for s in &mut self.sinks {
            s.online(report)?;
        }
        Ok(())
    }
}

pub struct Harness {
    instruments: Vec<Instrument>,
    index: HashMap<String, usize>,
    sinks: FanOut,
}

impl Harness {
    /// Build instruments and the sinks named by `cfg` (log always, export when enabled).
    pub fn new(cfg: &PerfConfig) -> Result<Self> {
        let mut sinks = FanOut::new();
        sinks.push(Box::new(LogSink::new(cfg.logging.online)));
        if cfg.export.enabled {
            sinks.push(Box::new(JsonLinesSink::new(cfg.export.path.clone())));
        }
        Self::with_sinks(cfg, sinks)
    }

    /// Build instruments from `cfg`, sending reports to `sinks`.
    pub fn with_sinks(cfg: &PerfConfig, sinks: FanOut) -> Result<Self> {
        let mut instruments: Vec<Instrument> = Vec::with_capacity(cfg.instruments.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(cfg.instruments.len());

        for section in &cfg.instruments {
            let inst = match &section.derive_from {
                Some(master) => {
                    let idx = *index.get(master.as_str()).ok_or_else(|| {
                        PerfError::BadConfig(format!(
                            "instrument {} derives from unknown instrument {master}",
                            section.label
                        ))
                    })?;
                    instruments[idx].derive(section.label.as_str())
                }
                None => Instrument::new(section.to_instrument_config()?)?,
            };
            tracing::info!(
                label = %section.label,
                derived_from = section.derive_from.as_deref().unwrap_or("-"),
                cycle = inst.config().cycle_length,
                sub_cycle = inst.config().sub_cycle_length,
                window_batches = inst.config().window_batches,
                "instrument registered"
            );
            index.insert(section.label.clone(), instruments.len());
            instruments.push(inst);
        }

        Ok(Self {
            instruments,
            index,
            sinks,
        })
    }

    /// Labels in config order.
    pub fn labels(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.label()).collect()
    }

    pub fn instrument(&self, label: &str) -> Option<&Instrument> {
        self.index.get(label).and_then(|&i| self.instruments.get(i))
    }

    pub fn instrument_mut(&mut self, label: &str) -> Option<&mut Instrument> {
        let idx = *self.index.get(label)?;
        self.instruments.get_mut(idx)
    }

    /// `report` on the named instrument, delivering to every sink.
    pub fn report(&mut self, label: &str, force: bool) -> Result<ReportOutcome> {
        let idx = *self
            .index
            .get(label)
            .ok_or_else(|| PerfError::UnknownInstrument(label.to_string()))?;
        let inst = &mut self.instruments[idx];
        match inst.report_into(force, &mut self.sinks) {
            Err(PerfError::InvalidOrder) => {
                tracing::warn!(label, "sample rejected: end precedes begin");
                Err(PerfError::InvalidOrder)
            }
            other => other,
        }
    }

    /// Publish every instrument's partial cycle. Returns how many reports were delivered.
    pub fn flush_all(&mut self) -> Result<usize> {
        let mut delivered = 0;
        for inst in &mut self.instruments {
            if inst.pending() == 0 {
                continue;
            }
            if let Some(record) = inst.flush()? {
                self.sinks.full(&record)?;
                delivered += 1;
            }
        }
        Ok(delivered)
    }
}
