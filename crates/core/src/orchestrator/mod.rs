//! Bounded batch orchestrator.
//!
//! Runs the cancellation workflow for every order in the manifest with a
//! fixed ceiling on concurrent executions and folds the per-order
//! outcomes into one aggregate result.

mod runner;
mod types;

pub use runner::BatchRunner;
pub use types::RunResult;
