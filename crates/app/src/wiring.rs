//! Root scope and facade construction.

use std::sync::Arc;

use capability::Scope;
use common::{CustomerId, Money};
use domain::memory::{
    InMemoryEventPublisher, InMemoryOrderRepository, InMemoryPaymentGateway,
    InMemoryPaymentRepository, InMemoryShipmentRepository, InMemoryShippingCarrier,
    RecordingNotifier, TracingLogger,
};
use domain::{
    Address, EventPublisher, Logger, OrderBundle, OrderFacade, OrderItem, PaymentBundle,
    PaymentFacade, PaymentMethod, ShippingBundle, ShippingFacade, StandardOrderValidator,
};
use saga::{FulfillmentRequest, OrderFulfillment};

use crate::config::FailurePoint;

/// Builds the root scope, one bundle per domain and the fulfillment saga.
///
/// Process-wide capabilities (logger, event publisher) are bound once in the
/// root scope. Each bundle binds only its own domain capabilities, so every
/// use case resolves the logger and publisher from the root.
#[derive(Debug, Default)]
pub struct Wiring {
    fail_at: Option<FailurePoint>,
}

impl Wiring {
    /// Creates a wiring with no injected failure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Breaks the given step of every run.
    pub fn fail_at(mut self, fail_at: Option<FailurePoint>) -> Self {
        self.fail_at = fail_at;
        self
    }

    /// Wires every capability and returns the running application.
    pub fn build(self) -> Application {
        let events = InMemoryEventPublisher::new();
        let root = Scope::root()
            .with::<dyn Logger>(Arc::new(TracingLogger))
            .with::<dyn EventPublisher>(Arc::new(events.clone()));

        let orders = InMemoryOrderRepository::new();
        let gateway = InMemoryPaymentGateway::new();
        let carrier = InMemoryShippingCarrier::new();

        match self.fail_at {
            Some(FailurePoint::CreateOrder) => orders.fail_on_save("order store unavailable"),
            Some(FailurePoint::ProcessPayment) => gateway.fail_on_perform("card declined"),
            Some(FailurePoint::CreateShipment) => carrier.fail_on_book("shipment error"),
            Some(FailurePoint::Refund) => {
                carrier.fail_on_book("shipment error");
                gateway.fail_on_reverse("gateway unavailable");
            }
            None => {}
        }

        let order_facade = OrderFacade::with_root(
            root.clone(),
            OrderBundle::local(
                Arc::new(orders.clone()),
                Arc::new(StandardOrderValidator::new()),
            ),
        );
        let payment_facade = PaymentFacade::with_root(
            root.clone(),
            PaymentBundle::local(
                Arc::new(gateway.clone()),
                Arc::new(InMemoryPaymentRepository::new()),
            ),
        );
        let shipping_facade = ShippingFacade::with_root(
            root.clone(),
            ShippingBundle::local(
                Arc::new(carrier.clone()),
                Arc::new(InMemoryShipmentRepository::new()),
                Arc::new(RecordingNotifier::new()),
            ),
        );

        tracing::debug!(capabilities = ?root.capability_names(), "root scope wired");

        Application {
            root,
            fulfillment: OrderFulfillment::new(
                Arc::new(order_facade),
                Arc::new(payment_facade),
                Arc::new(shipping_facade),
            ),
            events,
            orders,
            gateway,
            carrier,
        }
    }
}

/// A wired application with handles onto its in-memory state.
#[derive(Debug)]
pub struct Application {
    pub root: Scope,
    pub fulfillment: OrderFulfillment,
    pub events: InMemoryEventPublisher,
    pub orders: InMemoryOrderRepository,
    pub gateway: InMemoryPaymentGateway,
    pub carrier: InMemoryShippingCarrier,
}

/// The order the demo binary fulfills.
pub fn demo_request() -> FulfillmentRequest {
    FulfillmentRequest::new(
        CustomerId::new(),
        vec![
            OrderItem::new("SKU-001", 2, Money::from_cents(1000)),
            OrderItem::new("SKU-002", 1, Money::from_cents(2500)),
        ],
        PaymentMethod::Card {
            last4: "4242".to_string(),
        },
        Address::new("Ada Lovelace", "12 St James's Square", "London", "SW1Y 4JH", "UK"),
    )
}
