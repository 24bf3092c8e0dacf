//! Types for the cancellation workflow.

use std::fmt;
use thiserror::Error;

use crate::manifest::OrderNumber;
use crate::shopify::{ApiError, TransactionId, TransactionStatus};

/// The steps of the per-order cancellation sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelStep {
    ResolveOrder,
    ResolveAuthorization,
    VoidAuthorization,
    CancelOrder,
}

impl fmt::Display for CancelStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CancelStep::ResolveOrder => "order lookup",
            CancelStep::ResolveAuthorization => "authorization lookup",
            CancelStep::VoidAuthorization => "void",
            CancelStep::CancelOrder => "cancel",
        };
        write!(f, "{name}")
    }
}

/// Why a single order failed to cancel.
///
/// A failed step fails that order for the run; there is no retry. Transport
/// and decode failures during the lookup steps are carried in `Api` with
/// the step they interrupted.
#[derive(Debug, Error)]
pub enum CancelError {
    #[error("no order matches number {0}")]
    OrderNotFound(OrderNumber),

    #[error("order {0} has no transactions")]
    TransactionNotFound(OrderNumber),

    #[error("order {0} has no successful authorization to void")]
    NoEligibleAuthorization(OrderNumber),

    #[error("void of authorization {parent_id} returned status {status:?}")]
    VoidRejected {
        parent_id: TransactionId,
        status: TransactionStatus,
    },

    #[error("void of authorization {parent_id} failed: {source}")]
    VoidFailed {
        parent_id: TransactionId,
        #[source]
        source: ApiError,
    },

    #[error("cancel request for order {number} failed: {source}")]
    CancelFailed {
        number: OrderNumber,
        #[source]
        source: ApiError,
    },

    #[error("{step} failed: {source}")]
    Api {
        step: CancelStep,
        #[source]
        source: ApiError,
    },
}

impl CancelError {
    /// The step at which the workflow stopped.
    pub fn step(&self) -> CancelStep {
        match self {
            CancelError::OrderNotFound(_) => CancelStep::ResolveOrder,
            CancelError::TransactionNotFound(_) | CancelError::NoEligibleAuthorization(_) => {
                CancelStep::ResolveAuthorization
            }
            CancelError::VoidRejected { .. } | CancelError::VoidFailed { .. } => {
                CancelStep::VoidAuthorization
            }
            CancelError::CancelFailed { .. } => CancelStep::CancelOrder,
            CancelError::Api { step, .. } => *step,
        }
    }
}
