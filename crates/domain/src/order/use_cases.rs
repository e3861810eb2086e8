//! Order use cases.

use async_trait::async_trait;
use capability::{Requirements, Scope, UseCase};
use common::{CustomerId, OrderId};
use serde_json::json;

use super::{
    Order, OrderError, OrderItem, OrderRepository, OrderStatus, OrderValidator,
    TOTAL_OUT_OF_RANGE,
};
use crate::capabilities::{DomainEvent, EventPublisher, Logger};

/// Topic order events are published on.
pub const ORDER_TOPIC: &str = "orders";

/// Places a new pending order after validating its lines.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub customer_id: CustomerId,
    pub items: Vec<OrderItem>,
}

impl PlaceOrder {
    /// Creates a new PlaceOrder command.
    pub fn new(customer_id: CustomerId, items: Vec<OrderItem>) -> Self {
        Self { customer_id, items }
    }
}

#[async_trait]
impl UseCase for PlaceOrder {
    type Output = Order;
    type Error = OrderError;
    const NAME: &'static str = "place_order";

    fn requires() -> Requirements {
        Requirements::new()
            .require::<dyn OrderRepository>()
            .require::<dyn OrderValidator>()
            .require::<dyn EventPublisher>()
            .require::<dyn Logger>()
    }

    async fn run(self, scope: &Scope) -> Result<Order, OrderError> {
        let repository = scope.resolve::<dyn OrderRepository>()?;
        let validator = scope.resolve::<dyn OrderValidator>()?;
        let events = scope.resolve::<dyn EventPublisher>()?;
        let logger = scope.resolve::<dyn Logger>()?;

        validator.validate(&self.items)?;

        let order = Order::place(self.customer_id, self.items);
        // Custom validators may skip the range check.
        let total = order
            .total_amount()
            .ok_or_else(|| OrderError::Validation(TOTAL_OUT_OF_RANGE.to_string()))?;
        repository.save(&order).await?;

        events.publish(
            ORDER_TOPIC,
            DomainEvent::new(
                "OrderPlaced",
                json!({
                    "order_id": order.id,
                    "customer_id": order.customer_id,
                    "total_cents": total.cents(),
                }),
            ),
        );
        logger.log(
            Self::NAME,
            &format!("order {} placed for {total}", order.id),
        );

        Ok(order)
    }
}

/// Loads an existing order.
#[derive(Debug, Clone, Copy)]
pub struct GetOrder {
    pub order_id: OrderId,
}

#[async_trait]
impl UseCase for GetOrder {
    type Output = Order;
    type Error = OrderError;
    const NAME: &'static str = "get_order";

    fn requires() -> Requirements {
        Requirements::new().require::<dyn OrderRepository>()
    }

    async fn run(self, scope: &Scope) -> Result<Order, OrderError> {
        scope
            .resolve::<dyn OrderRepository>()?
            .find_by_id(self.order_id)
            .await?
            .ok_or(OrderError::NotFound(self.order_id))
    }
}

/// Cancels a pending order.
#[derive(Debug, Clone)]
pub struct CancelOrder {
    pub order_id: OrderId,
    pub reason: String,
}

impl CancelOrder {
    /// Creates a new CancelOrder command.
    pub fn new(order_id: OrderId, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl UseCase for CancelOrder {
    type Output = Order;
    type Error = OrderError;
    const NAME: &'static str = "cancel_order";

    fn requires() -> Requirements {
        Requirements::new()
            .require::<dyn OrderRepository>()
            .require::<dyn EventPublisher>()
            .require::<dyn Logger>()
    }

    async fn run(self, scope: &Scope) -> Result<Order, OrderError> {
        let repository = scope.resolve::<dyn OrderRepository>()?;
        let events = scope.resolve::<dyn EventPublisher>()?;
        let logger = scope.resolve::<dyn Logger>()?;

        let mut order = repository
            .find_by_id(self.order_id)
            .await?
            .ok_or(OrderError::NotFound(self.order_id))?;

        if !order.status.can_cancel() {
            return Err(OrderError::InvalidTransition {
                current: order.status,
                action: "cancel",
            });
        }

        repository
            .update_status(order.id, OrderStatus::Cancelled)
            .await?;
        order.status = OrderStatus::Cancelled;

        events.publish(
            ORDER_TOPIC,
            DomainEvent::new(
                "OrderCancelled",
                json!({ "order_id": order.id, "reason": self.reason }),
            ),
        );
        logger.log(
            Self::NAME,
            &format!("order {} cancelled: {}", order.id, self.reason),
        );

        Ok(order)
    }
}
