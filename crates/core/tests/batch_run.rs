//! Batch run integration tests.
//!
//! These exercise the orchestrator and workflow together against the mock
//! API: aggregate correctness, the concurrency ceiling, and the behavior
//! of mixed success/failure runs.

use std::sync::Arc;
use std::time::Duration;

use cancellara_core::shopify::TransactionStatus;
use cancellara_core::testing::{fixtures, MockOrdersApi, RecordedCall};
use cancellara_core::{BatchRunner, OrderCanceller};

fn runner(api: Arc<MockOrdersApi>, concurrency: usize) -> BatchRunner {
    let canceller = Arc::new(OrderCanceller::new(api, "JPY", true));
    BatchRunner::new(canceller, concurrency)
}

/// Script a fully cancellable order: resolvable, with one successful
/// authorization.
async fn script_good_order(api: &MockOrdersApi, id: u64, number: u64) {
    api.add_order(fixtures::order(id, number)).await;
    api.set_transactions(id, vec![fixtures::authorization(id * 10, TransactionStatus::Success)])
        .await;
}

#[tokio::test]
async fn test_all_orders_succeed() {
    let api = Arc::new(MockOrdersApi::new());
    script_good_order(&api, 900, 1001).await;
    script_good_order(&api, 901, 1002).await;
    script_good_order(&api, 902, 1003).await;

    let result = runner(Arc::clone(&api), 2).run(&[1001, 1002, 1003]).await;

    assert!(result.is_success());
    assert_eq!(result.total, 3);
    assert_eq!(result.succeeded(), 3);
    assert!(result.failed.is_empty());
}

#[tokio::test]
async fn test_one_failure_fails_the_run_but_not_other_orders() {
    let api = Arc::new(MockOrdersApi::new());
    script_good_order(&api, 900, 1001).await;
    // 1002 resolves but has no authorization to void.
    api.add_order(fixtures::order(901, 1002)).await;
    api.set_transactions(901, vec![fixtures::sale(50)]).await;

    let result = runner(Arc::clone(&api), 2).run(&[1001, 1002]).await;

    assert!(!result.is_success());
    assert_eq!(result.total, 2);
    assert_eq!(result.failed, vec![1002]);

    // 1001 must have been driven all the way to its cancel call even
    // though 1002 failed.
    let calls = api.recorded_calls().await;
    assert!(calls
        .iter()
        .any(|c| matches!(c, RecordedCall::CancelOrder { order_id: 900, .. })));
    // 1002 must never reach void or cancel.
    assert!(!calls
        .iter()
        .any(|c| matches!(c, RecordedCall::CancelOrder { order_id: 901, .. })));
    assert!(!calls
        .iter()
        .any(|c| matches!(c, RecordedCall::CreateVoid { order_id: 901, .. })));
}

#[tokio::test]
async fn test_unknown_order_fails_without_aborting_the_batch() {
    let api = Arc::new(MockOrdersApi::new());
    script_good_order(&api, 900, 1001).await;
    // 9999 is not scripted: the lookup returns an empty collection.

    let result = runner(Arc::clone(&api), 4).run(&[9999, 1001]).await;

    assert_eq!(result.failed, vec![9999]);
    assert_eq!(result.succeeded(), 1);

    // The unknown order's workflow stops at the lookup.
    let calls = api.recorded_calls().await;
    assert!(!calls
        .iter()
        .any(|c| matches!(c, RecordedCall::Transactions { order_id: 0 })));
}

#[tokio::test]
async fn test_concurrency_ceiling_is_respected() {
    let api = Arc::new(MockOrdersApi::new());
    for i in 0..8u64 {
        script_good_order(&api, 900 + i, 1001 + i).await;
    }
    api.set_call_delay(Duration::from_millis(20)).await;

    let numbers: Vec<u64> = (1001..1009).collect();
    let result = runner(Arc::clone(&api), 2).run(&numbers).await;

    assert!(result.is_success());
    assert!(
        api.max_in_flight() <= 2,
        "observed {} concurrent calls with a ceiling of 2",
        api.max_in_flight()
    );
}

#[tokio::test]
async fn test_concurrency_of_one_serializes_everything() {
    let api = Arc::new(MockOrdersApi::new());
    for i in 0..4u64 {
        script_good_order(&api, 900 + i, 1001 + i).await;
    }
    api.set_call_delay(Duration::from_millis(5)).await;

    let result = runner(Arc::clone(&api), 1).run(&[1001, 1002, 1003, 1004]).await;

    assert!(result.is_success());
    assert_eq!(api.max_in_flight(), 1);
}

#[tokio::test]
async fn test_empty_input_is_a_successful_noop() {
    let api = Arc::new(MockOrdersApi::new());

    let result = runner(Arc::clone(&api), 4).run(&[]).await;

    assert!(result.is_success());
    assert_eq!(result.total, 0);
    assert!(api.recorded_calls().await.is_empty());
}

#[tokio::test]
async fn test_failed_orders_reported_in_input_order() {
    let api = Arc::new(MockOrdersApi::new());
    script_good_order(&api, 900, 1001).await;
    // 1002 and 1004 are unknown, 1003 is fine.
    script_good_order(&api, 902, 1003).await;
    api.set_call_delay(Duration::from_millis(5)).await;

    let result = runner(Arc::clone(&api), 4)
        .run(&[1002, 1001, 1004, 1003])
        .await;

    assert_eq!(result.failed, vec![1002, 1004]);
}

#[tokio::test]
async fn test_every_order_gets_exactly_one_lookup() {
    let api = Arc::new(MockOrdersApi::new());
    script_good_order(&api, 900, 1001).await;
    script_good_order(&api, 901, 1002).await;

    runner(Arc::clone(&api), 2).run(&[1001, 1002]).await;

    let calls = api.recorded_calls().await;
    let lookups: Vec<_> = calls
        .iter()
        .filter(|c| matches!(c, RecordedCall::OrderByNumber { .. }))
        .collect();
    assert_eq!(lookups.len(), 2);
}
