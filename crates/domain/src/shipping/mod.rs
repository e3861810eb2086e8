//! Shipping domain: booking and cancelling shipments with a carrier.

mod bundle;
mod capabilities;
mod facade;
mod model;
mod use_cases;

pub use bundle::ShippingBundle;
pub use capabilities::{CarrierError, NotifyError, Notifier, ShipmentRepository, ShippingCarrier};
pub use facade::ShippingFacade;
pub use model::{Address, Shipment, ShipmentStatus};
pub use use_cases::{CancelShipment, CreateShipment, SHIPPING_TOPIC};

use capability::CapabilityError;
use common::ShipmentId;
use thiserror::Error;

use crate::error::StoreError;

/// Errors that can occur during shipping operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShippingError {
    /// The shipment request was rejected by validation.
    #[error("{0}")]
    Validation(String),

    /// The carrier refused or failed the operation.
    #[error(transparent)]
    Carrier(#[from] CarrierError),

    /// No shipment exists with the given id.
    #[error("Shipment not found: {0}")]
    NotFound(ShipmentId),

    /// The shipment is not in a state that allows the action.
    #[error("Shipment {shipment_id} is {status}, cannot {action}")]
    InvalidStatus {
        shipment_id: ShipmentId,
        status: ShipmentStatus,
        action: &'static str,
    },

    /// The shipment repository failed.
    #[error("Shipment store error: {0}")]
    Store(#[from] StoreError),

    /// A required capability was not in scope.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The carrier booked the shipment, it could not be recorded and the
    /// booking could not be cancelled either.
    #[error(
        "Shipment {tracking_number} booked but not recorded ({store}); cancellation failed: {cancellation}"
    )]
    Unrecorded {
        tracking_number: String,
        store: StoreError,
        cancellation: CarrierError,
    },
}

impl ShippingError {
    /// Returns true if the failed operation left a booking behind.
    pub fn left_residue(&self) -> bool {
        matches!(self, ShippingError::Unrecorded { .. })
    }
}
