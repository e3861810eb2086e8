//! Shared types used across every bounded domain.

mod money;
mod types;

pub use money::Money;
pub use types::{CustomerId, EntityId, OrderId, ShipmentId, TransactionId};
