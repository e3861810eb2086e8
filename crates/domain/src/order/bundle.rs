//! Capability bundle of the order domain.

use std::sync::Arc;

use capability::{Bindings, Bundle, CapabilityError};

use super::{OrderRepository, OrderValidator};
use crate::capabilities::{EventPublisher, Logger};

/// Every capability an order use case may require.
pub struct OrderBundle {
    repository: Arc<dyn OrderRepository>,
    validator: Arc<dyn OrderValidator>,
    events: Option<Arc<dyn EventPublisher>>,
    logger: Option<Arc<dyn Logger>>,
}

impl OrderBundle {
    /// Groups the order capabilities.
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        validator: Arc<dyn OrderValidator>,
        events: Arc<dyn EventPublisher>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            repository,
            validator,
            events: Some(events),
            logger: Some(logger),
        }
    }

    /// Groups only the order capabilities. The logger and event publisher
    /// must then come from the root scope the facade extends.
    pub fn local(
        repository: Arc<dyn OrderRepository>,
        validator: Arc<dyn OrderValidator>,
    ) -> Self {
        Self {
            repository,
            validator,
            events: None,
            logger: None,
        }
    }

    /// Returns the order repository.
    pub fn repository(&self) -> &Arc<dyn OrderRepository> {
        &self.repository
    }
}

impl Bundle for OrderBundle {
    fn name(&self) -> &'static str {
        "order"
    }

    fn bind(&self, bindings: &mut Bindings) -> Result<(), CapabilityError> {
        bindings
            .insert::<dyn OrderRepository>(self.repository.clone())?
            .insert::<dyn OrderValidator>(self.validator.clone())?;
        if let Some(events) = &self.events {
            bindings.insert::<dyn EventPublisher>(events.clone())?;
        }
        if let Some(logger) = &self.logger {
            bindings.insert::<dyn Logger>(logger.clone())?;
        }
        Ok(())
    }
}
