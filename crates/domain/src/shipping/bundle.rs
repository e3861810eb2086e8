//! Capability bundle of the shipping domain.

use std::sync::Arc;

use capability::{Bindings, Bundle, CapabilityError};

use super::{Notifier, ShipmentRepository, ShippingCarrier};
use crate::capabilities::{EventPublisher, Logger};

/// Every capability a shipping use case may require.
pub struct ShippingBundle {
    carrier: Arc<dyn ShippingCarrier>,
    repository: Arc<dyn ShipmentRepository>,
    notifier: Arc<dyn Notifier>,
    events: Option<Arc<dyn EventPublisher>>,
    logger: Option<Arc<dyn Logger>>,
}

impl ShippingBundle {
    /// Groups the shipping capabilities.
    pub fn new(
        carrier: Arc<dyn ShippingCarrier>,
        repository: Arc<dyn ShipmentRepository>,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn EventPublisher>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            carrier,
            repository,
            notifier,
            events: Some(events),
            logger: Some(logger),
        }
    }

    /// Groups only the shipping capabilities. The logger and event publisher
    /// must then come from the root scope the facade extends.
    pub fn local(
        carrier: Arc<dyn ShippingCarrier>,
        repository: Arc<dyn ShipmentRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            carrier,
            repository,
            notifier,
            events: None,
            logger: None,
        }
    }
}

impl Bundle for ShippingBundle {
    fn name(&self) -> &'static str {
        "shipping"
    }

    fn bind(&self, bindings: &mut Bindings) -> Result<(), CapabilityError> {
        bindings
            .insert::<dyn ShippingCarrier>(self.carrier.clone())?
            .insert::<dyn ShipmentRepository>(self.repository.clone())?
            .insert::<dyn Notifier>(self.notifier.clone())?;
        if let Some(events) = &self.events {
            bindings.insert::<dyn EventPublisher>(events.clone())?;
        }
        if let Some(logger) = &self.logger {
            bindings.insert::<dyn Logger>(logger.clone())?;
        }
        Ok(())
    }
}
