//! Testing utilities and mock implementations.
//!
//! `MockOrdersApi` stands in for the remote API so the workflow and
//! orchestrator can be exercised end to end without a store.

mod mock_api;

pub use mock_api::{MockOrdersApi, RecordedCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::manifest::OrderNumber;
    use crate::shopify::{Order, OrderId, Transaction, TransactionId, TransactionKind, TransactionStatus};

    /// Create a test order with reasonable defaults.
    pub fn order(id: OrderId, number: OrderNumber) -> Order {
        Order {
            id,
            order_number: number,
            email: Some("customer@example.com".to_string()),
            currency: Some("JPY".to_string()),
            financial_status: Some("authorized".to_string()),
            cancelled_at: None,
        }
    }

    /// Create an authorization transaction with the given status.
    pub fn authorization(id: TransactionId, status: TransactionStatus) -> Transaction {
        Transaction {
            id,
            kind: TransactionKind::Authorization,
            status,
            amount: Some("1000".to_string()),
            currency: Some("JPY".to_string()),
            parent_id: None,
            gateway: Some("mock".to_string()),
        }
    }

    /// Create a successful sale transaction.
    pub fn sale(id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: TransactionKind::Sale,
            status: TransactionStatus::Success,
            amount: Some("1000".to_string()),
            currency: Some("JPY".to_string()),
            parent_id: None,
            gateway: Some("mock".to_string()),
        }
    }
}
