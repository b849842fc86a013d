//! Shared error type across perftool crates.

use thiserror::Error;

/// Stable error codes surfaced to callers and sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// `end` preceded `begin`.
    InvalidOrder,
    /// Query issued before any data was committed.
    NotReady,
    /// Instrument configuration rejected at construction.
    Misconfigured,
    /// Percentile outside `[0, 1]`.
    InvalidQuantile,
    /// Malformed configuration document.
    BadConfig,
    /// Lookup of an instrument label that was never registered.
    UnknownInstrument,
    /// Sink I/O failure.
    Io,
}

impl ErrorCode {
    /// String representation used in logs and exported records.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidOrder => "INVALID_ORDER",
            ErrorCode::NotReady => "NOT_READY",
            ErrorCode::Misconfigured => "MISCONFIGURED",
            ErrorCode::InvalidQuantile => "INVALID_QUANTILE",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnknownInstrument => "UNKNOWN_INSTRUMENT",
            ErrorCode::Io => "IO",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PerfError>;

/// Unified error type used by core and runtime.
#[derive(Debug, Error)]
pub enum PerfError {
    #[error("invalid order: end timestamp precedes begin timestamp")]
    InvalidOrder,
    #[error("not ready: no committed samples")]
    NotReady,
    #[error("misconfigured: {0}")]
    Misconfigured(String),
    #[error("invalid quantile: {0} (expected 0.0..=1.0)")]
    InvalidQuantile(f64),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),
    #[error("io: {0}")]
    Io(String),
}

impl PerfError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PerfError::InvalidOrder => ErrorCode::InvalidOrder,
            PerfError::NotReady => ErrorCode::NotReady,
            PerfError::Misconfigured(_) => ErrorCode::Misconfigured,
            PerfError::InvalidQuantile(_) => ErrorCode::InvalidQuantile,
            PerfError::BadConfig(_) => ErrorCode::BadConfig,
            PerfError::UnknownInstrument(_) => ErrorCode::UnknownInstrument,
            PerfError::Io(_) => ErrorCode::Io,
        }
    }
}
