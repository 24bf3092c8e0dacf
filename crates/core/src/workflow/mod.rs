//! Per-order cancellation workflow.
//!
//! Drives one order through the four dependent steps:
//! resolve order -> resolve authorization -> void -> cancel.

mod cancel;
mod types;

pub use cancel::OrderCanceller;
pub use types::{CancelError, CancelStep};
