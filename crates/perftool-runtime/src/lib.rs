//! perftool runtime library entry.
//!
//! This crate wires configuration, logging, report sinks and the instrument
//! harness around `perftool-core`. It is consumed by the `perftool` binary
//! (`main.rs`) and by integration tests.

pub mod config;
pub mod export;
pub mod harness;
pub mod obs;
