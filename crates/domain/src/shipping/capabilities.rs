//! Capabilities of the shipping domain.

use async_trait::async_trait;
use common::{OrderId, ShipmentId};
use thiserror::Error;

use super::{Address, Shipment, ShipmentStatus};
use crate::error::StoreError;

/// Errors reported by a shipping carrier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarrierError {
    /// The carrier refused to book the shipment.
    #[error("{0}")]
    Rejected(String),

    /// The carrier could not cancel the shipment.
    #[error("Cancellation of {tracking_number} failed: {reason}")]
    CancellationFailed {
        tracking_number: String,
        reason: String,
    },
}

/// Errors reported by a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Notification to {recipient} failed: {reason}")]
pub struct NotifyError {
    pub recipient: String,
    pub reason: String,
}

/// External carrier booking deliveries.
#[async_trait]
pub trait ShippingCarrier: Send + Sync {
    /// Books a delivery and returns its tracking number.
    async fn book(&self, order_id: OrderId, address: &Address) -> Result<String, CarrierError>;

    /// Cancels a booked delivery.
    async fn cancel(&self, tracking_number: &str) -> Result<(), CarrierError>;
}

/// Persistence for shipments.
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    /// Stores `shipment`, replacing any previous version.
    async fn save(&self, shipment: &Shipment) -> Result<(), StoreError>;

    /// Loads a shipment by id.
    async fn find_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError>;

    /// Sets the status of an existing shipment.
    async fn update_status(&self, id: ShipmentId, status: ShipmentStatus)
    -> Result<(), StoreError>;
}

/// Sends customer-facing notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message` to `recipient`.
    async fn notify(&self, recipient: &str, message: &str) -> Result<(), NotifyError>;
}
