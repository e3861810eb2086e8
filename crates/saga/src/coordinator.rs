//! Order fulfillment coordinator.

use std::sync::Arc;

use domain::{OrderFacade, PaymentFacade, ShippingFacade};

use crate::error::FulfillmentError;
use crate::order_fulfillment::{
    CreateOrderStep, CreateShipmentStep, Fulfillment, FulfillmentRequest, ProcessPaymentStep,
    SAGA_TYPE,
};
use crate::outcome::SagaRun;
use crate::saga::Saga;

/// The facades the fulfillment steps call. Shared read-only across runs.
#[derive(Debug, Clone)]
pub struct FulfillmentContext {
    pub orders: Arc<OrderFacade>,
    pub payments: Arc<PaymentFacade>,
    pub shipping: Arc<ShippingFacade>,
}

/// The order fulfillment saga.
pub type FulfillmentSaga = Saga<FulfillmentContext, Fulfillment, FulfillmentError>;

/// Report of one order fulfillment run.
pub type FulfillmentRun = SagaRun<Fulfillment, FulfillmentError>;

/// Builds the three-step fulfillment saga.
pub fn fulfillment_saga() -> FulfillmentSaga {
    Saga::builder(SAGA_TYPE)
        .step(CreateOrderStep)
        .step(ProcessPaymentStep)
        .step(CreateShipmentStep)
        .build()
}

/// Orchestrates order fulfillment across the order, payment and shipping
/// facades, rolling back completed steps when a later one fails.
pub struct OrderFulfillment {
    context: FulfillmentContext,
    saga: FulfillmentSaga,
}

impl OrderFulfillment {
    /// Creates a coordinator over the given facades.
    pub fn new(
        orders: Arc<OrderFacade>,
        payments: Arc<PaymentFacade>,
        shipping: Arc<ShippingFacade>,
    ) -> Self {
        Self {
            context: FulfillmentContext {
                orders,
                payments,
                shipping,
            },
            saga: fulfillment_saga(),
        }
    }

    /// Returns the facades the saga runs against.
    pub fn context(&self) -> &FulfillmentContext {
        &self.context
    }

    /// Returns the underlying saga.
    pub fn saga(&self) -> &FulfillmentSaga {
        &self.saga
    }

    /// Executes an order fulfillment saga for the given request.
    ///
    /// Never returns early: the report always carries a terminal outcome.
    #[tracing::instrument(skip_all, fields(customer_id = %request.customer_id))]
    pub async fn execute(&self, request: FulfillmentRequest) -> FulfillmentRun {
        self.saga
            .run(&self.context, Fulfillment::new(request))
            .await
    }
}

impl std::fmt::Debug for OrderFulfillment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderFulfillment")
            .field("saga", &self.saga)
            .finish()
    }
}
