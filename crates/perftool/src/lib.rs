//! Top-level facade crate for perftool.
//!
//! Re-exports the measurement core and the runtime library so users can depend on a single crate.

pub mod core {
    pub use perftool_core::*;
}

pub mod runtime {
    pub use perftool_runtime::*;
}
