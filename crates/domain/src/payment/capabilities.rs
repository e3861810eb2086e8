//! Capabilities of the payment domain.

use async_trait::async_trait;
use common::{Money, TransactionId};
use thiserror::Error;

use super::{Payment, PaymentMethod, PaymentStatus};
use crate::error::StoreError;

/// Errors reported by a payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The gateway refused the charge.
    #[error("{0}")]
    Declined(String),

    /// The gateway could not reverse the transaction.
    #[error("Reversal of {transaction_id} failed: {reason}")]
    ReversalFailed {
        transaction_id: TransactionId,
        reason: String,
    },
}

/// External payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges `amount` using `method`.
    async fn perform(
        &self,
        amount: Money,
        method: &PaymentMethod,
    ) -> Result<TransactionId, GatewayError>;

    /// Reverses a previous charge.
    async fn reverse(&self, transaction_id: TransactionId, amount: Money)
    -> Result<(), GatewayError>;
}

/// Persistence for captured payments.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Stores `payment`, replacing any previous version.
    async fn save(&self, payment: &Payment) -> Result<(), StoreError>;

    /// Loads a payment by transaction id.
    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Payment>, StoreError>;

    /// Sets the status of an existing payment.
    async fn update_status(
        &self,
        id: TransactionId,
        status: PaymentStatus,
    ) -> Result<(), StoreError>;
}
