//! Mock orders API for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::manifest::OrderNumber;
use crate::shopify::{
    ApiError, Order, OrderId, OrdersApi, Transaction, TransactionId, TransactionKind,
    TransactionStatus,
};

/// A recorded API call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    OrderByNumber {
        number: OrderNumber,
    },
    Transactions {
        order_id: OrderId,
    },
    CreateVoid {
        order_id: OrderId,
        parent_id: TransactionId,
        currency: String,
    },
    CancelOrder {
        order_id: OrderId,
        notify_customer: bool,
    },
}

/// Mock implementation of the OrdersApi trait.
///
/// Provides controllable behavior for testing:
/// - Scripted orders, transaction lists and void statuses
/// - Recorded calls for sequencing and short-circuit assertions
/// - Failure injection per endpoint
/// - Optional per-call latency plus an in-flight counter, for asserting
///   the orchestrator's concurrency ceiling
pub struct MockOrdersApi {
    /// Orders matched by order number on lookup.
    orders: Arc<RwLock<Vec<Order>>>,
    /// Transaction lists keyed by internal order id.
    transactions: Arc<RwLock<HashMap<OrderId, Vec<Transaction>>>>,
    /// Status returned for voids keyed by parent id (default: success).
    void_statuses: Arc<RwLock<HashMap<TransactionId, TransactionStatus>>>,
    /// Recorded calls in arrival order.
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    /// If set, the next call to the endpoint fails with this error.
    next_order_error: Arc<RwLock<Option<ApiError>>>,
    next_transactions_error: Arc<RwLock<Option<ApiError>>>,
    next_void_error: Arc<RwLock<Option<ApiError>>>,
    next_cancel_error: Arc<RwLock<Option<ApiError>>>,
    /// Simulated latency per call.
    call_delay: Arc<RwLock<Option<Duration>>>,
    /// Concurrency instrumentation.
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for MockOrdersApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockOrdersApi")
            .field("max_in_flight", &self.max_in_flight.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MockOrdersApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOrdersApi {
    /// Create a new mock with no scripted orders.
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(Vec::new())),
            transactions: Arc::new(RwLock::new(HashMap::new())),
            void_statuses: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_order_error: Arc::new(RwLock::new(None)),
            next_transactions_error: Arc::new(RwLock::new(None)),
            next_void_error: Arc::new(RwLock::new(None)),
            next_cancel_error: Arc::new(RwLock::new(None)),
            call_delay: Arc::new(RwLock::new(None)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Script an order for lookup by its order number.
    pub async fn add_order(&self, order: Order) {
        self.orders.write().await.push(order);
    }

    /// Script the transaction list for an internal order id.
    pub async fn set_transactions(&self, order_id: OrderId, transactions: Vec<Transaction>) {
        self.transactions.write().await.insert(order_id, transactions);
    }

    /// Script the status of the void created for a parent transaction.
    pub async fn set_void_status(&self, parent_id: TransactionId, status: TransactionStatus) {
        self.void_statuses.write().await.insert(parent_id, status);
    }

    pub async fn fail_next_order_lookup(&self, error: ApiError) {
        *self.next_order_error.write().await = Some(error);
    }

    pub async fn fail_next_transactions(&self, error: ApiError) {
        *self.next_transactions_error.write().await = Some(error);
    }

    pub async fn fail_next_void(&self, error: ApiError) {
        *self.next_void_error.write().await = Some(error);
    }

    pub async fn fail_next_cancel(&self, error: ApiError) {
        *self.next_cancel_error.write().await = Some(error);
    }

    /// Add latency to every call so overlapping executions are observable.
    pub async fn set_call_delay(&self, delay: Duration) {
        *self.call_delay.write().await = Some(delay);
    }

    /// Calls recorded so far, in arrival order.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// The highest number of calls observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn record(&self, call: RecordedCall) {
        self.calls.write().await.push(call);
    }

    async fn simulate_latency(&self) {
        let delay = *self.call_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn enter(&self) -> InFlightGuard {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrdersApi for MockOrdersApi {
    async fn order_by_number(&self, number: OrderNumber) -> Result<Vec<Order>, ApiError> {
        let _guard = self.enter();
        self.record(RecordedCall::OrderByNumber { number }).await;
        self.simulate_latency().await;

        if let Some(error) = self.next_order_error.write().await.take() {
            return Err(error);
        }

        Ok(self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.order_number == number)
            .cloned()
            .collect())
    }

    async fn transactions(&self, order_id: OrderId) -> Result<Vec<Transaction>, ApiError> {
        let _guard = self.enter();
        self.record(RecordedCall::Transactions { order_id }).await;
        self.simulate_latency().await;

        if let Some(error) = self.next_transactions_error.write().await.take() {
            return Err(error);
        }

        Ok(self
            .transactions
            .read()
            .await
            .get(&order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_void(
        &self,
        order_id: OrderId,
        parent_id: TransactionId,
        currency: &str,
    ) -> Result<Transaction, ApiError> {
        let _guard = self.enter();
        self.record(RecordedCall::CreateVoid {
            order_id,
            parent_id,
            currency: currency.to_string(),
        })
        .await;
        self.simulate_latency().await;

        if let Some(error) = self.next_void_error.write().await.take() {
            return Err(error);
        }

        let status = self
            .void_statuses
            .read()
            .await
            .get(&parent_id)
            .copied()
            .unwrap_or(TransactionStatus::Success);

        Ok(Transaction {
            id: parent_id + 1,
            kind: TransactionKind::Void,
            status,
            amount: None,
            currency: Some(currency.to_string()),
            parent_id: Some(parent_id),
            gateway: Some("mock".to_string()),
        })
    }

    async fn cancel_order(
        &self,
        order_id: OrderId,
        notify_customer: bool,
    ) -> Result<Order, ApiError> {
        let _guard = self.enter();
        self.record(RecordedCall::CancelOrder {
            order_id,
            notify_customer,
        })
        .await;
        self.simulate_latency().await;

        if let Some(error) = self.next_cancel_error.write().await.take() {
            return Err(error);
        }

        let existing = self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.id == order_id)
            .cloned();

        let mut order = existing.unwrap_or(Order {
            id: order_id,
            order_number: 0,
            email: None,
            currency: None,
            financial_status: None,
            cancelled_at: None,
        });
        order.cancelled_at = Some("2020-07-01T00:00:00Z".to_string());
        Ok(order)
    }
}
