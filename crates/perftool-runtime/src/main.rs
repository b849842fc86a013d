//! perftool demo runner
//!
//! - Config: `perftool [config.yaml]`, built-in default when omitted
//! - Logging initialized once, before any instrument is built
//! - Each iteration: begin, simulated work, end, report (per instrument)
//! - Partial cycles are flushed to the sinks on exit

use std::time::Duration;

use perftool_core::error::{PerfError, Result};
use perftool_runtime::{config, harness::Harness, obs};

#[tokio::main]
async fn main() {
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(&path),
        None => config::load_default(),
    };
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("perftool: {e} ({})", e.code().as_str());
            std::process::exit(2);
        }
    };

    if let Err(e) = obs::init_logging(&cfg.logging) {
        eprintln!("perftool: {e} ({})", e.code().as_str());
        std::process::exit(2);
    }

    if let Err(e) = run(&cfg).await {
        tracing::error!(error = %e, code = e.code().as_str(), "perftool run failed");
        std::process::exit(1);
    }
}

async fn run(cfg: &config::PerfConfig) -> Result<()> {
    let mut harness = Harness::new(cfg)?;
    let labels: Vec<String> = harness.labels().into_iter().map(String::from).collect();
    let work = Duration::from_micros(cfg.workload.sleep_micros);

    tracing::info!(
        instruments = labels.len(),
        iterations = cfg.workload.iterations,
        "perftool workload starting"
    );

    for _ in 0..cfg.workload.iterations {
        for label in &labels {
            let inst = harness
                .instrument_mut(label)
                .ok_or_else(|| PerfError::UnknownInstrument(label.clone()))?;
            inst.begin();
            tokio::time::sleep(work).await;
            inst.end();
            harness.report(label, false)?;
        }
    }

    let flushed = harness.flush_all()?;
    tracing::info!(flushed, "perftool workload finished");
    Ok(())
}
