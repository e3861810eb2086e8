//! Order domain: placing, reading and cancelling orders.

mod bundle;
mod capabilities;
mod facade;
mod model;
mod state;
mod use_cases;
mod validator;

pub use bundle::OrderBundle;
pub use capabilities::{OrderRepository, OrderValidator};
pub use facade::OrderFacade;
pub use model::{Order, OrderItem, ProductId};
pub use state::OrderStatus;
pub use use_cases::{CancelOrder, GetOrder, ORDER_TOPIC, PlaceOrder};
pub use validator::{StandardOrderValidator, TOTAL_OUT_OF_RANGE};

use capability::CapabilityError;
use common::OrderId;
use thiserror::Error;

use crate::error::StoreError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    /// The order request was rejected by validation.
    #[error("{0}")]
    Validation(String),

    /// No order exists with the given id.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The order is not in a state that allows the action.
    #[error("Invalid state transition: cannot {action} from {current} state")]
    InvalidTransition {
        current: OrderStatus,
        action: &'static str,
    },

    /// The order repository failed.
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),

    /// A required capability was not in scope.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}
