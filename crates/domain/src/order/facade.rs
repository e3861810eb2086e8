//! Public entry point of the order domain.

use capability::{Facade, Scope};
use common::{CustomerId, OrderId};

use super::{CancelOrder, GetOrder, Order, OrderBundle, OrderError, OrderItem, PlaceOrder};

/// Facade over the order bundle.
#[derive(Debug)]
pub struct OrderFacade {
    inner: Facade<OrderBundle>,
}

impl OrderFacade {
    /// Creates a facade under an empty root scope.
    pub fn new(bundle: OrderBundle) -> Self {
        Self {
            inner: Facade::new(bundle),
        }
    }

    /// Creates a facade whose call scopes extend `root`.
    pub fn with_root(root: Scope, bundle: OrderBundle) -> Self {
        Self {
            inner: Facade::with_root(root, bundle),
        }
    }

    /// Returns the wrapped bundle.
    pub fn bundle(&self) -> &OrderBundle {
        self.inner.bundle()
    }

    /// Places a new order.
    #[tracing::instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn place_order(
        &self,
        customer_id: CustomerId,
        items: Vec<OrderItem>,
    ) -> Result<Order, OrderError> {
        self.inner
            .execute(PlaceOrder::new(customer_id, items))
            .await
    }

    /// Loads an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.inner.execute(GetOrder { order_id }).await
    }

    /// Cancels a pending order.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(
        &self,
        order_id: OrderId,
        reason: &str,
    ) -> Result<Order, OrderError> {
        self.inner.execute(CancelOrder::new(order_id, reason)).await
    }
}
