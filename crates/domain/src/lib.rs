//! Bounded domains of the fulfillment workflow.
//!
//! Each domain (order, payment, shipping) contributes:
//! - capability traits describing its infrastructure
//! - use cases declaring the capabilities they need
//! - a bundle grouping one instance of every capability
//! - a facade, the only entry point external callers use
//!
//! In-memory capability implementations live in [`memory`].

pub mod capabilities;
pub mod error;
pub mod memory;
pub mod order;
pub mod payment;
pub mod shipping;

pub use capabilities::{DomainEvent, EventPublisher, Logger};
pub use error::StoreError;
pub use order::{
    CancelOrder, GetOrder, Order, OrderBundle, OrderError, OrderFacade, OrderItem,
    OrderRepository, OrderStatus, OrderValidator, PlaceOrder, ProductId, StandardOrderValidator,
    TOTAL_OUT_OF_RANGE,
};
pub use payment::{
    GatewayError, Payment, PaymentBundle, PaymentError, PaymentFacade, PaymentGateway,
    PaymentMethod, PaymentRepository, PaymentStatus, ProcessPayment, RefundPayment,
};
pub use shipping::{
    Address, CancelShipment, CarrierError, CreateShipment, NotifyError, Notifier, Shipment,
    ShipmentRepository, ShipmentStatus, ShippingBundle, ShippingCarrier, ShippingError,
    ShippingFacade,
};
