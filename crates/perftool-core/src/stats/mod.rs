//! Aggregation structures: the per-sub-cycle accumulator, the batch being filled,
//! and the rolling window queried for full reports.

pub mod accumulator;
pub mod batch;
pub mod window;

pub use accumulator::{OnlineAccumulator, OnlineSnapshot};
pub use batch::BatchBuffer;
pub use window::RollingWindow;
