//! Integration tests for the order, payment and shipping facades.

use std::sync::Arc;

use capability::{CapabilityError, Scope};
use common::{CustomerId, Money, OrderId, TransactionId};
use domain::memory::{
    InMemoryEventPublisher, InMemoryOrderRepository, InMemoryPaymentGateway,
    InMemoryPaymentRepository, InMemoryShipmentRepository, InMemoryShippingCarrier,
    RecordingLogger, RecordingNotifier,
};
use domain::{
    Address, EventPublisher, GetOrder, Logger, OrderBundle, OrderError, OrderFacade, OrderItem,
    OrderRepository, OrderStatus, PaymentBundle, PaymentError, PaymentFacade, PaymentMethod,
    PaymentStatus, PlaceOrder, ShipmentStatus, ShippingBundle, ShippingError, ShippingFacade,
    StandardOrderValidator, StoreError,
};

struct OrderHarness {
    facade: OrderFacade,
    repository: InMemoryOrderRepository,
    events: InMemoryEventPublisher,
    logger: RecordingLogger,
}

impl OrderHarness {
    fn new() -> Self {
        let repository = InMemoryOrderRepository::new();
        let events = InMemoryEventPublisher::new();
        let logger = RecordingLogger::new();
        let facade = OrderFacade::new(OrderBundle::new(
            Arc::new(repository.clone()),
            Arc::new(StandardOrderValidator::new()),
            Arc::new(events.clone()),
            Arc::new(logger.clone()),
        ));
        Self {
            facade,
            repository,
            events,
            logger,
        }
    }
}

struct PaymentHarness {
    facade: PaymentFacade,
    gateway: InMemoryPaymentGateway,
    repository: InMemoryPaymentRepository,
}

impl PaymentHarness {
    fn new() -> Self {
        let gateway = InMemoryPaymentGateway::new();
        let repository = InMemoryPaymentRepository::new();
        let facade = PaymentFacade::new(PaymentBundle::new(
            Arc::new(gateway.clone()),
            Arc::new(repository.clone()),
            Arc::new(InMemoryEventPublisher::new()),
            Arc::new(RecordingLogger::new()),
        ));
        Self {
            facade,
            gateway,
            repository,
        }
    }
}

struct ShippingHarness {
    facade: ShippingFacade,
    carrier: InMemoryShippingCarrier,
    repository: InMemoryShipmentRepository,
    notifier: RecordingNotifier,
    logger: RecordingLogger,
}

impl ShippingHarness {
    fn new() -> Self {
        let carrier = InMemoryShippingCarrier::new();
        let repository = InMemoryShipmentRepository::new();
        let notifier = RecordingNotifier::new();
        let logger = RecordingLogger::new();
        let facade = ShippingFacade::new(ShippingBundle::new(
            Arc::new(carrier.clone()),
            Arc::new(repository.clone()),
            Arc::new(notifier.clone()),
            Arc::new(InMemoryEventPublisher::new()),
            Arc::new(logger.clone()),
        ));
        Self {
            facade,
            carrier,
            repository,
            notifier,
            logger,
        }
    }
}

fn items() -> Vec<OrderItem> {
    vec![
        OrderItem::new("SKU-001", 2, Money::from_cents(1000)),
        OrderItem::new("SKU-002", 1, Money::from_cents(2500)),
    ]
}

fn card() -> PaymentMethod {
    PaymentMethod::Card {
        last4: "4242".to_string(),
    }
}

fn address() -> Address {
    Address::new("Ada Lovelace", "12 St James's Square", "London", "SW1Y 4JH", "UK")
}

#[tokio::test]
async fn test_place_order_persists_publishes_and_logs() {
    let h = OrderHarness::new();

    let order = h.facade.place_order(CustomerId::new(), items()).await.unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount(), Some(Money::from_cents(4500)));
    assert_eq!(h.repository.get(order.id), Some(order.clone()));
    assert_eq!(h.events.event_names(), vec!["OrderPlaced"]);
    assert_eq!(h.logger.lines().len(), 1);
    assert!(h.logger.lines()[0].starts_with("place_order: order"));
}

#[tokio::test]
async fn test_place_order_without_items_fails_validation() {
    let h = OrderHarness::new();

    let err = h
        .facade
        .place_order(CustomerId::new(), vec![])
        .await
        .unwrap_err();

    assert_eq!(err, OrderError::Validation("Order must have items".to_string()));
    assert!(h.repository.is_empty());
    assert!(h.events.event_names().is_empty());
}

#[tokio::test]
async fn test_place_order_with_overflowing_total_fails_validation() {
    let h = OrderHarness::new();
    let huge = Money::from_cents(i64::MAX / 2 + 1);

    let err = h
        .facade
        .place_order(CustomerId::new(), vec![OrderItem::new("X", 2, huge)])
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OrderError::Validation("Line total for X is out of range".to_string())
    );
    assert!(h.repository.is_empty());
    assert!(h.events.event_names().is_empty());
}

#[tokio::test]
async fn test_get_and_cancel_order() {
    let h = OrderHarness::new();
    let order = h.facade.place_order(CustomerId::new(), items()).await.unwrap();

    let cancelled = h.facade.cancel_order(order.id, "customer request").await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let loaded = h.facade.get_order(order.id).await.unwrap();
    assert_eq!(loaded.status, OrderStatus::Cancelled);
    assert_eq!(h.events.event_names(), vec!["OrderPlaced", "OrderCancelled"]);

    let again = h.facade.cancel_order(order.id, "twice").await.unwrap_err();
    assert!(matches!(
        again,
        OrderError::InvalidTransition {
            current: OrderStatus::Cancelled,
            action: "cancel"
        }
    ));
}

#[tokio::test]
async fn test_get_unknown_order() {
    let h = OrderHarness::new();
    let id = OrderId::new();
    assert_eq!(h.facade.get_order(id).await, Err(OrderError::NotFound(id)));
}

#[tokio::test]
async fn test_use_case_runs_directly_under_a_matching_scope() {
    let repository = InMemoryOrderRepository::new();
    let order = domain::Order::place(CustomerId::new(), items());
    repository.save(&order).await.unwrap();

    // GetOrder only needs the repository; nothing else has to be bound.
    let scope = Scope::root().with::<dyn OrderRepository>(Arc::new(repository));
    let loaded = scope.execute(GetOrder { order_id: order.id }).await.unwrap();
    assert_eq!(loaded, order);

    // PlaceOrder declares more than this scope provides.
    let err = scope
        .execute(PlaceOrder::new(CustomerId::new(), items()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::Capability(CapabilityError::Unresolved { .. })
    ));
}

#[tokio::test]
async fn test_root_scope_capabilities_are_shadowed_by_the_bundle() {
    let root_logger = RecordingLogger::new();
    let bundle_logger = RecordingLogger::new();
    let root = Scope::root()
        .with::<dyn Logger>(Arc::new(root_logger.clone()))
        .with::<dyn EventPublisher>(Arc::new(InMemoryEventPublisher::new()));

    let facade = OrderFacade::with_root(
        root,
        OrderBundle::new(
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(StandardOrderValidator::new()),
            Arc::new(InMemoryEventPublisher::new()),
            Arc::new(bundle_logger.clone()),
        ),
    );

    facade.place_order(CustomerId::new(), items()).await.unwrap();

    assert!(root_logger.lines().is_empty());
    assert_eq!(bundle_logger.lines().len(), 1);
}

#[tokio::test]
async fn test_local_bundle_resolves_shared_capabilities_from_root() {
    let root_logger = RecordingLogger::new();
    let root_events = InMemoryEventPublisher::new();
    let root = Scope::root()
        .with::<dyn Logger>(Arc::new(root_logger.clone()))
        .with::<dyn EventPublisher>(Arc::new(root_events.clone()));

    let facade = OrderFacade::with_root(
        root,
        OrderBundle::local(
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(StandardOrderValidator::new()),
        ),
    );

    facade.place_order(CustomerId::new(), items()).await.unwrap();

    assert_eq!(root_logger.lines().len(), 1);
    assert_eq!(root_events.event_names(), vec!["OrderPlaced"]);
}

#[tokio::test]
async fn test_local_bundle_without_root_is_unresolved() {
    let repository = InMemoryOrderRepository::new();
    let facade = OrderFacade::new(OrderBundle::local(
        Arc::new(repository.clone()),
        Arc::new(StandardOrderValidator::new()),
    ));

    let err = facade
        .place_order(CustomerId::new(), items())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrderError::Capability(CapabilityError::Unresolved { .. })
    ));
    assert!(repository.is_empty());
}

#[tokio::test]
async fn test_process_and_refund_payment() {
    let h = PaymentHarness::new();
    let order_id = OrderId::new();

    let payment = h
        .facade
        .process_payment(order_id, Money::from_cents(4500), card())
        .await
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Captured);
    assert_eq!(h.gateway.active_charge_count(), 1);

    let refunded = h.facade.refund_payment(payment.transaction_id).await.unwrap();
    assert_eq!(refunded.status, PaymentStatus::Refunded);
    assert_eq!(h.gateway.reversals(), vec![payment.transaction_id]);
    assert_eq!(
        h.repository.get(payment.transaction_id).unwrap().status,
        PaymentStatus::Refunded
    );

    let twice = h.facade.refund_payment(payment.transaction_id).await;
    assert!(matches!(twice, Err(PaymentError::InvalidStatus { .. })));
}

#[tokio::test]
async fn test_payment_validation_and_decline() {
    let h = PaymentHarness::new();

    let err = h
        .facade
        .process_payment(OrderId::new(), Money::zero(), card())
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::Validation(_)));

    h.gateway.fail_on_perform("card declined");
    let err = h
        .facade
        .process_payment(OrderId::new(), Money::from_cents(100), card())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "card declined");
    assert!(h.repository.is_empty());
}

#[tokio::test]
async fn test_unrecorded_payment_is_reversed() {
    let h = PaymentHarness::new();
    h.repository.fail_on_save("store down");

    let err = h
        .facade
        .process_payment(OrderId::new(), Money::from_cents(4500), card())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PaymentError::Store(StoreError::Unavailable("store down".to_string()))
    );
    assert!(!err.left_residue());
    assert_eq!(h.gateway.active_charge_count(), 0);
    assert_eq!(h.gateway.reversals().len(), 1);
}

#[tokio::test]
async fn test_unrecorded_payment_that_cannot_be_reversed_reports_residue() {
    let h = PaymentHarness::new();
    h.repository.fail_on_save("store down");
    h.gateway.fail_on_reverse("gateway unavailable");

    let err = h
        .facade
        .process_payment(OrderId::new(), Money::from_cents(4500), card())
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::Unrecorded { .. }));
    assert!(err.left_residue());
    assert_eq!(h.gateway.active_charge_count(), 1);
}

#[tokio::test]
async fn test_refund_unknown_transaction() {
    let h = PaymentHarness::new();
    let txn = TransactionId::new();
    assert_eq!(
        h.facade.refund_payment(txn).await,
        Err(PaymentError::NotFound(txn))
    );
}

#[tokio::test]
async fn test_create_and_cancel_shipment() {
    let h = ShippingHarness::new();
    let order_id = OrderId::new();

    let shipment = h.facade.create_shipment(order_id, address()).await.unwrap();
    assert_eq!(shipment.status, ShipmentStatus::Booked);
    assert_eq!(shipment.tracking_number, "TRACK-0001");
    assert_eq!(h.notifier.sent().len(), 1);
    assert_eq!(h.notifier.sent()[0].0, "Ada Lovelace");

    let cancelled = h.facade.cancel_shipment(shipment.id).await.unwrap();
    assert_eq!(cancelled.status, ShipmentStatus::Cancelled);
    assert_eq!(h.carrier.booking_count(), 0);
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_shipment() {
    let h = ShippingHarness::new();
    h.notifier.fail_with("smtp down");

    let shipment = h
        .facade
        .create_shipment(OrderId::new(), address())
        .await
        .unwrap();

    assert_eq!(shipment.status, ShipmentStatus::Booked);
    assert!(
        h.logger
            .lines()
            .iter()
            .any(|line| line.contains("notification skipped"))
    );
}

#[tokio::test]
async fn test_unrecorded_shipment_is_cancelled() {
    let h = ShippingHarness::new();
    h.repository.fail_on_save("store down");

    let err = h
        .facade
        .create_shipment(OrderId::new(), address())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ShippingError::Store(StoreError::Unavailable("store down".to_string()))
    );
    assert_eq!(h.carrier.booking_count(), 0);
    assert_eq!(h.carrier.cancellations(), vec!["TRACK-0001".to_string()]);
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_unrecorded_shipment_that_cannot_be_cancelled_reports_residue() {
    let h = ShippingHarness::new();
    h.repository.fail_on_save("store down");
    h.carrier.fail_on_cancel("carrier offline");

    let err = h
        .facade
        .create_shipment(OrderId::new(), address())
        .await
        .unwrap_err();

    match &err {
        ShippingError::Unrecorded {
            tracking_number, ..
        } => assert_eq!(tracking_number, "TRACK-0001"),
        other => panic!("Expected Unrecorded, got {other:?}"),
    }
    assert!(err.left_residue());
    assert_eq!(h.carrier.booking_count(), 1);
}

#[tokio::test]
async fn test_shipment_rejections() {
    let h = ShippingHarness::new();

    let mut incomplete = address();
    incomplete.city = String::new();
    let err = h
        .facade
        .create_shipment(OrderId::new(), incomplete)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ShippingError::Validation("Shipping address is missing city".to_string())
    );

    h.carrier.fail_on_book("shipment error");
    let err = h
        .facade
        .create_shipment(OrderId::new(), address())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "shipment error");
}
