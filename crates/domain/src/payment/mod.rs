//! Payment domain: capturing and refunding payments through a gateway.

mod bundle;
mod capabilities;
mod facade;
mod model;
mod use_cases;

pub use bundle::PaymentBundle;
pub use capabilities::{GatewayError, PaymentGateway, PaymentRepository};
pub use facade::PaymentFacade;
pub use model::{Payment, PaymentMethod, PaymentStatus};
pub use use_cases::{PAYMENT_TOPIC, ProcessPayment, RefundPayment};

use capability::CapabilityError;
use common::TransactionId;
use thiserror::Error;

use crate::error::StoreError;

/// Errors that can occur during payment operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaymentError {
    /// The payment request was rejected by validation.
    #[error("{0}")]
    Validation(String),

    /// The gateway declined or failed the operation.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// No payment exists for the transaction.
    #[error("Payment not found: {0}")]
    NotFound(TransactionId),

    /// The payment is not in a state that allows the action.
    #[error("Payment {transaction_id} is {status}, cannot {action}")]
    InvalidStatus {
        transaction_id: TransactionId,
        status: PaymentStatus,
        action: &'static str,
    },

    /// The payment repository failed.
    #[error("Payment store error: {0}")]
    Store(#[from] StoreError),

    /// A required capability was not in scope.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The charge went through, could not be recorded and could not be
    /// reversed either. The customer is still charged.
    #[error(
        "Payment {transaction_id} captured but not recorded ({store}); reversal failed: {reversal}"
    )]
    Unrecorded {
        transaction_id: TransactionId,
        store: StoreError,
        reversal: GatewayError,
    },
}

impl PaymentError {
    /// Returns true if the failed operation left a charge behind.
    pub fn left_residue(&self) -> bool {
        matches!(self, PaymentError::Unrecorded { .. })
    }
}
