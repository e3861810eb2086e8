//! In-memory capability implementations.
//!
//! Every type is cheap to clone and shares its state between clones, so a
//! test can keep a handle for inspection while the bundle owns another.
//! Failure switches let tests inject errors at any capability boundary.

mod observers;
mod payment;
mod repository;
mod shipping;

pub use observers::{InMemoryEventPublisher, RecordingLogger, TracingLogger};
pub use payment::InMemoryPaymentGateway;
pub use repository::{
    InMemoryOrderRepository, InMemoryPaymentRepository, InMemoryRepository,
    InMemoryShipmentRepository,
};
pub use shipping::{InMemoryShippingCarrier, RecordingNotifier};

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Acquires a read guard, recovering the data of a poisoned lock.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Acquires a write guard, recovering the data of a poisoned lock.
fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
