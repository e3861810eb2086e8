//! Capabilities of the order domain.

use async_trait::async_trait;
use common::OrderId;

use super::{Order, OrderError, OrderItem, OrderStatus};
use crate::error::StoreError;

/// Persistence for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores `order`, replacing any previous version.
    async fn save(&self, order: &Order) -> Result<(), StoreError>;

    /// Loads an order by id.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Sets the status of an existing order.
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), StoreError>;
}

/// Business rules an order request must satisfy.
pub trait OrderValidator: Send + Sync {
    /// Checks the requested lines, returning [`OrderError::Validation`] on
    /// the first violated rule.
    fn validate(&self, items: &[OrderItem]) -> Result<(), OrderError>;
}
