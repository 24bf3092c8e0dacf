//! The four-step cancellation sequence for a single order.

use std::sync::Arc;
use tracing::debug;

use crate::manifest::OrderNumber;
use crate::shopify::{Order, OrdersApi, Transaction, TransactionStatus};

use super::types::{CancelError, CancelStep};

/// Cancels a single order against the remote API.
///
/// Each step depends on the previous one's output and the sequence
/// short-circuits on the first failure; an order that fails at the void
/// step is never sent a cancel request. Steps 3 and 4 mutate remote state
/// and are not idempotent, so re-running an already-cancelled order
/// surfaces as a void or cancel failure rather than a distinct state.
pub struct OrderCanceller {
    api: Arc<dyn OrdersApi>,
    currency: String,
    notify_customer: bool,
}

impl OrderCanceller {
    pub fn new(api: Arc<dyn OrdersApi>, currency: impl Into<String>, notify_customer: bool) -> Self {
        Self {
            api,
            currency: currency.into(),
            notify_customer,
        }
    }

    /// Run the full cancellation sequence for one order number.
    pub async fn cancel(&self, number: OrderNumber) -> Result<(), CancelError> {
        let order = self.resolve_order(number).await?;
        let authorization = self.resolve_authorization(number, &order).await?;

        debug!(
            order_number = number,
            order_id = order.id,
            transaction_id = authorization.id,
            "Voiding authorization"
        );
        let void = self
            .api
            .create_void(order.id, authorization.id, &self.currency)
            .await
            .map_err(|source| CancelError::VoidFailed {
                parent_id: authorization.id,
                source,
            })?;
        if void.status != TransactionStatus::Success {
            return Err(CancelError::VoidRejected {
                parent_id: authorization.id,
                status: void.status,
            });
        }

        debug!(order_number = number, order_id = order.id, "Cancelling order");
        self.api
            .cancel_order(order.id, self.notify_customer)
            .await
            .map_err(|source| CancelError::CancelFailed { number, source })?;

        Ok(())
    }

    /// Step 1: look up the order by its customer-facing number. The API
    /// returns a collection; anything short of one match is a failure.
    async fn resolve_order(&self, number: OrderNumber) -> Result<Order, CancelError> {
        let mut orders = self
            .api
            .order_by_number(number)
            .await
            .map_err(|source| CancelError::Api {
                step: CancelStep::ResolveOrder,
                source,
            })?;

        if orders.is_empty() {
            return Err(CancelError::OrderNotFound(number));
        }
        Ok(orders.remove(0))
    }

    /// Step 2: fetch the order's transactions and pick the first
    /// successful authorization, in the order the API returned them.
    async fn resolve_authorization(
        &self,
        number: OrderNumber,
        order: &Order,
    ) -> Result<Transaction, CancelError> {
        let transactions =
            self.api
                .transactions(order.id)
                .await
                .map_err(|source| CancelError::Api {
                    step: CancelStep::ResolveAuthorization,
                    source,
                })?;

        if transactions.is_empty() {
            return Err(CancelError::TransactionNotFound(number));
        }

        transactions
            .into_iter()
            .find(|tx| tx.is_voidable_authorization())
            .ok_or(CancelError::NoEligibleAuthorization(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::{ApiError, TransactionKind};
    use crate::testing::{fixtures, MockOrdersApi, RecordedCall};

    fn canceller(api: Arc<MockOrdersApi>) -> OrderCanceller {
        OrderCanceller::new(api, "JPY", true)
    }

    #[tokio::test]
    async fn test_happy_path_runs_all_four_steps() {
        let api = Arc::new(MockOrdersApi::new());
        api.add_order(fixtures::order(900, 1001)).await;
        api.set_transactions(900, vec![fixtures::authorization(77, TransactionStatus::Success)])
            .await;

        canceller(Arc::clone(&api)).cancel(1001).await.unwrap();

        let calls = api.recorded_calls().await;
        assert_eq!(
            calls,
            vec![
                RecordedCall::OrderByNumber { number: 1001 },
                RecordedCall::Transactions { order_id: 900 },
                RecordedCall::CreateVoid {
                    order_id: 900,
                    parent_id: 77,
                    currency: "JPY".to_string(),
                },
                RecordedCall::CancelOrder {
                    order_id: 900,
                    notify_customer: true,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_zero_match_lookup_is_order_not_found() {
        let api = Arc::new(MockOrdersApi::new());

        let err = canceller(Arc::clone(&api)).cancel(1001).await.unwrap_err();
        assert!(matches!(err, CancelError::OrderNotFound(1001)));

        // The workflow must not proceed to the transaction lookup.
        let calls = api.recorded_calls().await;
        assert_eq!(calls, vec![RecordedCall::OrderByNumber { number: 1001 }]);
    }

    #[tokio::test]
    async fn test_empty_transaction_list_is_transaction_not_found() {
        let api = Arc::new(MockOrdersApi::new());
        api.add_order(fixtures::order(900, 1001)).await;
        api.set_transactions(900, vec![]).await;

        let err = canceller(api).cancel(1001).await.unwrap_err();
        assert!(matches!(err, CancelError::TransactionNotFound(1001)));
    }

    #[tokio::test]
    async fn test_no_eligible_authorization() {
        let api = Arc::new(MockOrdersApi::new());
        api.add_order(fixtures::order(900, 1001)).await;
        api.set_transactions(900, vec![fixtures::authorization(5, TransactionStatus::Failure)])
            .await;

        let err = canceller(Arc::clone(&api)).cancel(1001).await.unwrap_err();
        assert!(matches!(err, CancelError::NoEligibleAuthorization(1001)));

        // Short-circuit: neither void nor cancel may be issued.
        let calls = api.recorded_calls().await;
        assert!(!calls
            .iter()
            .any(|c| matches!(c, RecordedCall::CreateVoid { .. } | RecordedCall::CancelOrder { .. })));
    }

    #[tokio::test]
    async fn test_first_eligible_authorization_wins() {
        let api = Arc::new(MockOrdersApi::new());
        api.add_order(fixtures::order(900, 1001)).await;
        api.set_transactions(
            900,
            vec![
                fixtures::sale(10),
                fixtures::authorization(20, TransactionStatus::Failure),
                fixtures::authorization(77, TransactionStatus::Success),
                fixtures::authorization(99, TransactionStatus::Success),
            ],
        )
        .await;

        canceller(Arc::clone(&api)).cancel(1001).await.unwrap();

        let calls = api.recorded_calls().await;
        assert!(calls.iter().any(|c| matches!(
            c,
            RecordedCall::CreateVoid { parent_id: 77, .. }
        )));
        assert!(!calls.iter().any(|c| matches!(
            c,
            RecordedCall::CreateVoid { parent_id: 99, .. }
        )));
    }

    #[tokio::test]
    async fn test_void_returning_non_success_status_fails() {
        let api = Arc::new(MockOrdersApi::new());
        api.add_order(fixtures::order(900, 1001)).await;
        api.set_transactions(900, vec![fixtures::authorization(77, TransactionStatus::Success)])
            .await;
        api.set_void_status(77, TransactionStatus::Failure).await;

        let err = canceller(Arc::clone(&api)).cancel(1001).await.unwrap_err();
        assert!(matches!(
            err,
            CancelError::VoidRejected {
                parent_id: 77,
                status: TransactionStatus::Failure
            }
        ));

        // Cancel must never run after a rejected void.
        let calls = api.recorded_calls().await;
        assert!(!calls
            .iter()
            .any(|c| matches!(c, RecordedCall::CancelOrder { .. })));
    }

    #[tokio::test]
    async fn test_void_transport_error_is_void_failed() {
        let api = Arc::new(MockOrdersApi::new());
        api.add_order(fixtures::order(900, 1001)).await;
        api.set_transactions(900, vec![fixtures::authorization(77, TransactionStatus::Success)])
            .await;
        api.fail_next_void(ApiError::Timeout).await;

        let err = canceller(api).cancel(1001).await.unwrap_err();
        assert!(matches!(err, CancelError::VoidFailed { parent_id: 77, .. }));
        assert_eq!(err.step(), CancelStep::VoidAuthorization);
    }

    #[tokio::test]
    async fn test_cancel_transport_error_is_cancel_failed() {
        let api = Arc::new(MockOrdersApi::new());
        api.add_order(fixtures::order(900, 1001)).await;
        api.set_transactions(900, vec![fixtures::authorization(77, TransactionStatus::Success)])
            .await;
        api.fail_next_cancel(ApiError::ConnectionFailed("refused".to_string()))
            .await;

        let err = canceller(api).cancel(1001).await.unwrap_err();
        assert!(matches!(err, CancelError::CancelFailed { number: 1001, .. }));
    }

    #[tokio::test]
    async fn test_lookup_transport_error_carries_step() {
        let api = Arc::new(MockOrdersApi::new());
        api.fail_next_order_lookup(ApiError::Timeout).await;

        let err = canceller(api).cancel(1001).await.unwrap_err();
        assert!(matches!(
            err,
            CancelError::Api {
                step: CancelStep::ResolveOrder,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_first_order_used_when_lookup_returns_many() {
        let api = Arc::new(MockOrdersApi::new());
        api.add_order(fixtures::order(900, 1001)).await;
        api.add_order(fixtures::order(901, 1001)).await;
        api.set_transactions(900, vec![fixtures::authorization(77, TransactionStatus::Success)])
            .await;

        canceller(Arc::clone(&api)).cancel(1001).await.unwrap();

        let calls = api.recorded_calls().await;
        assert!(calls
            .iter()
            .any(|c| matches!(c, RecordedCall::Transactions { order_id: 900 })));
    }

    #[tokio::test]
    async fn test_unknown_kind_transactions_are_skipped() {
        let api = Arc::new(MockOrdersApi::new());
        api.add_order(fixtures::order(900, 1001)).await;
        api.set_transactions(
            900,
            vec![
                Transaction {
                    id: 1,
                    kind: TransactionKind::Unknown,
                    status: TransactionStatus::Success,
                    amount: None,
                    currency: None,
                    parent_id: None,
                    gateway: None,
                },
                fixtures::authorization(77, TransactionStatus::Success),
            ],
        )
        .await;

        canceller(Arc::clone(&api)).cancel(1001).await.unwrap();
        let calls = api.recorded_calls().await;
        assert!(calls.iter().any(|c| matches!(
            c,
            RecordedCall::CreateVoid { parent_id: 77, .. }
        )));
    }
}
