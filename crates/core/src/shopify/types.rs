//! Types for the Shopify Admin API boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manifest::OrderNumber;

/// Opaque order identifier assigned by Shopify, distinct from the
/// customer-facing order number. Required for all per-order calls after
/// the initial lookup.
pub type OrderId = u64;

/// Transaction identifier assigned by Shopify.
pub type TransactionId = u64;

/// The remote representation of an order, reduced to the fields the
/// cancellation flow consumes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
}

/// A financial transaction on an order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub parent_id: Option<TransactionId>,
    #[serde(default)]
    pub gateway: Option<String>,
}

impl Transaction {
    /// Whether this transaction is an authorization that can be voided.
    pub fn is_voidable_authorization(&self) -> bool {
        self.kind == TransactionKind::Authorization && self.status == TransactionStatus::Success
    }
}

/// Transaction kind as reported by the API.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Authorization,
    Capture,
    Sale,
    Void,
    Refund,
    #[serde(other)]
    Unknown,
}

/// Transaction status as reported by the API.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Failure,
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

// Response envelopes, per the Admin REST conventions.

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersEnvelope {
    pub orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionsEnvelope {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionEnvelope {
    pub transaction: Transaction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderEnvelope {
    pub order: Order,
}

// Request bodies.

#[derive(Debug, Serialize)]
pub(crate) struct VoidRequest<'a> {
    pub transaction: VoidTransaction<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VoidTransaction<'a> {
    pub kind: &'a str,
    pub currency: &'a str,
    pub parent_id: TransactionId,
}

#[derive(Debug, Serialize)]
pub(crate) struct CancelRequest {
    pub email: bool,
}

/// Errors from the API transport layer.
///
/// Decode failures are distinct from transport/status failures so callers
/// can tell a broken connection from an unexpected response shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// The remote order-management operations the cancellation flow depends on.
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Look up orders by customer-facing order number. The API returns a
    /// collection; zero or many matches are possible.
    async fn order_by_number(&self, number: OrderNumber) -> Result<Vec<Order>, ApiError>;

    /// Fetch the transaction list for an order.
    async fn transactions(&self, order_id: OrderId) -> Result<Vec<Transaction>, ApiError>;

    /// Create a void transaction against an authorization.
    async fn create_void(
        &self,
        order_id: OrderId,
        parent_id: TransactionId,
        currency: &str,
    ) -> Result<Transaction, ApiError>;

    /// Cancel an order, optionally emailing the customer.
    async fn cancel_order(
        &self,
        order_id: OrderId,
        notify_customer: bool,
    ) -> Result<Order, ApiError>;
}
