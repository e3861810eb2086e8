//! Shipping use cases.

use async_trait::async_trait;
use capability::{Requirements, Scope, UseCase};
use chrono::Utc;
use common::{OrderId, ShipmentId};
use serde_json::json;

use super::{
    Address, Notifier, Shipment, ShipmentRepository, ShipmentStatus, ShippingCarrier,
    ShippingError,
};
use crate::capabilities::{DomainEvent, EventPublisher, Logger};

/// Topic shipping events are published on.
pub const SHIPPING_TOPIC: &str = "shipments";

/// Books a shipment for an order and notifies the recipient.
///
/// A failed notification is logged and does not fail the booking. A booking
/// that cannot be recorded is cancelled before the error is returned.
#[derive(Debug, Clone)]
pub struct CreateShipment {
    pub order_id: OrderId,
    pub address: Address,
}

impl CreateShipment {
    /// Creates a new CreateShipment command.
    pub fn new(order_id: OrderId, address: Address) -> Self {
        Self { order_id, address }
    }
}

#[async_trait]
impl UseCase for CreateShipment {
    type Output = Shipment;
    type Error = ShippingError;
    const NAME: &'static str = "create_shipment";

    fn requires() -> Requirements {
        Requirements::new()
            .require::<dyn ShippingCarrier>()
            .require::<dyn ShipmentRepository>()
            .require::<dyn Notifier>()
            .require::<dyn EventPublisher>()
            .require::<dyn Logger>()
    }

    async fn run(self, scope: &Scope) -> Result<Shipment, ShippingError> {
        let carrier = scope.resolve::<dyn ShippingCarrier>()?;
        let repository = scope.resolve::<dyn ShipmentRepository>()?;
        let notifier = scope.resolve::<dyn Notifier>()?;
        let events = scope.resolve::<dyn EventPublisher>()?;
        let logger = scope.resolve::<dyn Logger>()?;

        if let Some(field) = self.address.first_missing_field() {
            return Err(ShippingError::Validation(format!(
                "Shipping address is missing {field}"
            )));
        }

        let tracking_number = carrier.book(self.order_id, &self.address).await?;
        let shipment = Shipment {
            id: ShipmentId::new(),
            order_id: self.order_id,
            address: self.address,
            tracking_number,
            status: ShipmentStatus::Booked,
            booked_at: Utc::now(),
        };
        if let Err(store) = repository.save(&shipment).await {
            logger.log(
                Self::NAME,
                &format!(
                    "cancelling unrecorded booking {}: {store}",
                    shipment.tracking_number
                ),
            );
            let cancelled = carrier.cancel(&shipment.tracking_number).await;
            return Err(match cancelled {
                Ok(()) => ShippingError::Store(store),
                Err(cancellation) => ShippingError::Unrecorded {
                    tracking_number: shipment.tracking_number,
                    store,
                    cancellation,
                },
            });
        }

        let message = format!(
            "Your order {} ships with tracking number {}",
            shipment.order_id, shipment.tracking_number
        );
        if let Err(err) = notifier
            .notify(&shipment.address.recipient, &message)
            .await
        {
            logger.log(Self::NAME, &format!("notification skipped: {err}"));
        }

        events.publish(
            SHIPPING_TOPIC,
            DomainEvent::new(
                "ShipmentBooked",
                json!({
                    "shipment_id": shipment.id,
                    "order_id": shipment.order_id,
                    "tracking_number": shipment.tracking_number,
                }),
            ),
        );
        logger.log(
            Self::NAME,
            &format!(
                "shipment {} booked for order {}",
                shipment.id, shipment.order_id
            ),
        );

        Ok(shipment)
    }
}

/// Cancels a booked shipment with the carrier.
#[derive(Debug, Clone, Copy)]
pub struct CancelShipment {
    pub shipment_id: ShipmentId,
}

#[async_trait]
impl UseCase for CancelShipment {
    type Output = Shipment;
    type Error = ShippingError;
    const NAME: &'static str = "cancel_shipment";

    fn requires() -> Requirements {
        Requirements::new()
            .require::<dyn ShippingCarrier>()
            .require::<dyn ShipmentRepository>()
            .require::<dyn EventPublisher>()
            .require::<dyn Logger>()
    }

    async fn run(self, scope: &Scope) -> Result<Shipment, ShippingError> {
        let carrier = scope.resolve::<dyn ShippingCarrier>()?;
        let repository = scope.resolve::<dyn ShipmentRepository>()?;
        let events = scope.resolve::<dyn EventPublisher>()?;
        let logger = scope.resolve::<dyn Logger>()?;

        let mut shipment = repository
            .find_by_id(self.shipment_id)
            .await?
            .ok_or(ShippingError::NotFound(self.shipment_id))?;

        if shipment.status != ShipmentStatus::Booked {
            return Err(ShippingError::InvalidStatus {
                shipment_id: shipment.id,
                status: shipment.status,
                action: "cancel",
            });
        }

        carrier.cancel(&shipment.tracking_number).await?;
        repository
            .update_status(shipment.id, ShipmentStatus::Cancelled)
            .await?;
        shipment.status = ShipmentStatus::Cancelled;

        events.publish(
            SHIPPING_TOPIC,
            DomainEvent::new(
                "ShipmentCancelled",
                json!({ "shipment_id": shipment.id, "order_id": shipment.order_id }),
            ),
        );
        logger.log(Self::NAME, &format!("shipment {} cancelled", shipment.id));

        Ok(shipment)
    }
}
