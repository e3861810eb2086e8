//! Public entry point of the shipping domain.

use capability::{Facade, Scope};
use common::{OrderId, ShipmentId};

use super::{Address, CancelShipment, CreateShipment, Shipment, ShippingBundle, ShippingError};

/// Facade over the shipping bundle.
#[derive(Debug)]
pub struct ShippingFacade {
    inner: Facade<ShippingBundle>,
}

impl ShippingFacade {
    /// Creates a facade under an empty root scope.
    pub fn new(bundle: ShippingBundle) -> Self {
        Self {
            inner: Facade::new(bundle),
        }
    }

    /// Creates a facade whose call scopes extend `root`.
    pub fn with_root(root: Scope, bundle: ShippingBundle) -> Self {
        Self {
            inner: Facade::with_root(root, bundle),
        }
    }

    /// Books a shipment for an order.
    #[tracing::instrument(skip(self, address))]
    pub async fn create_shipment(
        &self,
        order_id: OrderId,
        address: Address,
    ) -> Result<Shipment, ShippingError> {
        self.inner
            .execute(CreateShipment::new(order_id, address))
            .await
    }

    /// Cancels a booked shipment.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_shipment(&self, shipment_id: ShipmentId) -> Result<Shipment, ShippingError> {
        self.inner.execute(CancelShipment { shipment_id }).await
    }
}
