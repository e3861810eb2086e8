//! Capability bundle of the payment domain.

use std::sync::Arc;

use capability::{Bindings, Bundle, CapabilityError};

use super::{PaymentGateway, PaymentRepository};
use crate::capabilities::{EventPublisher, Logger};

/// Every capability a payment use case may require.
pub struct PaymentBundle {
    gateway: Arc<dyn PaymentGateway>,
    repository: Arc<dyn PaymentRepository>,
    events: Option<Arc<dyn EventPublisher>>,
    logger: Option<Arc<dyn Logger>>,
}

impl PaymentBundle {
    /// Groups the payment capabilities.
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        repository: Arc<dyn PaymentRepository>,
        events: Arc<dyn EventPublisher>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            gateway,
            repository,
            events: Some(events),
            logger: Some(logger),
        }
    }

    /// Groups only the payment capabilities. The logger and event publisher
    /// must then come from the root scope the facade extends.
    pub fn local(
        gateway: Arc<dyn PaymentGateway>,
        repository: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            gateway,
            repository,
            events: None,
            logger: None,
        }
    }
}

impl Bundle for PaymentBundle {
    fn name(&self) -> &'static str {
        "payment"
    }

    fn bind(&self, bindings: &mut Bindings) -> Result<(), CapabilityError> {
        bindings
            .insert::<dyn PaymentGateway>(self.gateway.clone())?
            .insert::<dyn PaymentRepository>(self.repository.clone())?;
        if let Some(events) = &self.events {
            bindings.insert::<dyn EventPublisher>(events.clone())?;
        }
        if let Some(logger) = &self.logger {
            bindings.insert::<dyn Logger>(logger.clone())?;
        }
        Ok(())
    }
}
