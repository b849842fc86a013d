//! Observability: process-wide logging setup and the log-line report sink.
//!
//! Logging is initialized once per process by the caller, before instruments
//! are built. Instruments never touch the subscriber; they only emit through
//! the `tracing` facade.

pub mod log_sink;

use std::fs::OpenOptions;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{fmt, EnvFilter};

use perftool_core::error::{PerfError, Result};

use crate::config::LoggingSection;

pub use log_sink::LogSink;

static INIT: OnceLock<bool> = OnceLock::new();

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` wins over `logging.filter`. Returns `Ok(true)` when this call
/// installed the subscriber and `Ok(false)` when logging was already set up
/// (by an earlier call or by someone else).
pub fn init_logging(cfg: &LoggingSection) -> Result<bool> {
    if INIT.get().is_some() {
        return Ok(false);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(&cfg.filter)
            .map_err(|e| PerfError::BadConfig(format!("invalid logging.filter: {e}")))?,
    };

    let installed = match &cfg.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| PerfError::Io(format!("open log file {}: {e}", path.display())))?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .is_ok()
        }
        None => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };

    let _ = INIT.set(installed);
    Ok(installed)
}
