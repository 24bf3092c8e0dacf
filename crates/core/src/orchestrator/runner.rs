//! Batch runner implementation.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::manifest::OrderNumber;
use crate::workflow::OrderCanceller;

use super::types::RunResult;

/// Runs the cancellation workflow for a whole manifest.
///
/// One task is spawned per order; a semaphore keeps at most `concurrency`
/// workflows in flight. Orders never abort each other: every order is
/// attempted and the runner returns only after all tasks have joined.
/// Outcomes travel back through the task handles, so aggregation has a
/// single writer and no state is shared between workers.
pub struct BatchRunner {
    canceller: Arc<OrderCanceller>,
    concurrency: usize,
}

impl BatchRunner {
    /// Create a new runner. `concurrency` must be validated to be >= 1
    /// at config-load time.
    pub fn new(canceller: Arc<OrderCanceller>, concurrency: usize) -> Self {
        Self {
            canceller,
            concurrency,
        }
    }

    /// Cancel every order in the list and aggregate the outcomes.
    pub async fn run(&self, order_numbers: &[OrderNumber]) -> RunResult {
        let total = order_numbers.len();
        info!(
            orders = total,
            concurrency = self.concurrency,
            "Starting cancellation run"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(total);

        for &number in order_numbers {
            let canceller = Arc::clone(&self.canceller);
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed");

                let outcome = canceller.cancel(number).await;
                match &outcome {
                    Ok(()) => {
                        info!(order_number = number, "Order cancelled");
                    }
                    Err(e) => {
                        error!(
                            order_number = number,
                            step = %e.step(),
                            error = %e,
                            "Order failed to cancel"
                        );
                    }
                }
                outcome
            });
            handles.push(handle);
        }

        // Join barrier: every order is always attempted, failures included.
        let joined = futures::future::join_all(handles).await;

        let mut failed: Vec<OrderNumber> = Vec::new();
        for (&number, joined) in order_numbers.iter().zip(joined) {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(_)) => failed.push(number),
                Err(join_error) => {
                    // A panicked worker fails its order like any other error.
                    warn!(
                        order_number = number,
                        error = %join_error,
                        "Cancellation task panicked"
                    );
                    failed.push(number);
                }
            }
        }

        let result = RunResult { total, failed };
        if result.is_success() {
            info!(orders = result.total, "Cancellation run succeeded");
        } else {
            error!(
                orders = result.total,
                failed = ?result.failed,
                "Cancellation run finished with failures"
            );
        }
        result
    }
}
