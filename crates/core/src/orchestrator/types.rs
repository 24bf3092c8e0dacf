//! Types for the batch orchestrator.

use serde::Serialize;

use crate::manifest::OrderNumber;

/// Aggregate result of one batch run.
///
/// Carries the failed order numbers rather than a bare pass/fail flag so
/// the numbers do not have to be recovered from the log stream.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// How many orders were attempted.
    pub total: usize,
    /// Orders that failed to cancel, in input order.
    pub failed: Vec<OrderNumber>,
}

impl RunResult {
    /// True only if every attempted order was cancelled.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.total - self.failed.len()
    }
}
