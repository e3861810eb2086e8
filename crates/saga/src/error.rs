//! Fulfillment saga error types.

use domain::{OrderError, PaymentError, ShippingError};
use thiserror::Error;

/// Errors a fulfillment step or compensation can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FulfillmentError {
    /// The order domain failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The payment domain failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The shipping domain failed.
    #[error(transparent)]
    Shipping(#[from] ShippingError),

    /// A step ran without the result of the step it depends on.
    #[error("Step '{step}' requires the {needs} produced by an earlier step")]
    MissingStepResult {
        step: &'static str,
        needs: &'static str,
    },
}

impl FulfillmentError {
    /// Returns true if the failed operation left an external side effect
    /// that no compensation will undo.
    pub fn left_residue(&self) -> bool {
        match self {
            FulfillmentError::Payment(err) => err.left_residue(),
            FulfillmentError::Shipping(err) => err.left_residue(),
            FulfillmentError::Order(_) | FulfillmentError::MissingStepResult { .. } => false,
        }
    }
}
