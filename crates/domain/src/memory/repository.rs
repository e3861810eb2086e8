//! In-memory repositories for orders, payments and shipments.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{OrderId, ShipmentId, TransactionId};

use super::{read, write};
use crate::error::StoreError;
use crate::order::{Order, OrderRepository, OrderStatus};
use crate::payment::{Payment, PaymentRepository, PaymentStatus};
use crate::shipping::{Shipment, ShipmentRepository, ShipmentStatus};

#[derive(Debug)]
struct RepositoryState<K, V> {
    records: HashMap<K, V>,
    fail_on_save: Option<String>,
    fail_on_update: Option<String>,
}

impl<K, V> Default for RepositoryState<K, V> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            fail_on_save: None,
            fail_on_update: None,
        }
    }
}

/// A keyed in-memory table implementing the repository capabilities.
#[derive(Debug)]
pub struct InMemoryRepository<K, V> {
    state: Arc<RwLock<RepositoryState<K, V>>>,
}

/// In-memory [`OrderRepository`].
pub type InMemoryOrderRepository = InMemoryRepository<OrderId, Order>;

/// In-memory [`PaymentRepository`].
pub type InMemoryPaymentRepository = InMemoryRepository<TransactionId, Payment>;

/// In-memory [`ShipmentRepository`].
pub type InMemoryShipmentRepository = InMemoryRepository<ShipmentId, Shipment>;

impl<K, V> Clone for InMemoryRepository<K, V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<K, V> Default for InMemoryRepository<K, V> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(RepositoryState::default())),
        }
    }
}

impl<K, V> InMemoryRepository<K, V>
where
    K: Eq + Hash + Copy + std::fmt::Display,
    V: Clone,
{
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `save` fail with `reason`.
    pub fn fail_on_save(&self, reason: impl Into<String>) {
        write(&self.state).fail_on_save = Some(reason.into());
    }

    /// Makes every subsequent `update_status` fail with `reason`.
    pub fn fail_on_update(&self, reason: impl Into<String>) {
        write(&self.state).fail_on_update = Some(reason.into());
    }

    /// Clears all injected failures.
    pub fn clear_failures(&self) {
        let mut state = write(&self.state);
        state.fail_on_save = None;
        state.fail_on_update = None;
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        read(&self.state).records.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        read(&self.state).records.is_empty()
    }

    /// Returns a copy of the record stored under `key`.
    pub fn get(&self, key: K) -> Option<V> {
        read(&self.state).records.get(&key).cloned()
    }

    /// Returns a copy of every stored record, in no particular order.
    pub fn values(&self) -> Vec<V> {
        read(&self.state).records.values().cloned().collect()
    }

    fn store(&self, key: K, value: V) -> Result<(), StoreError> {
        let mut state = write(&self.state);
        if let Some(reason) = &state.fail_on_save {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        state.records.insert(key, value);
        Ok(())
    }

    fn modify(&self, key: K, apply: impl FnOnce(&mut V)) -> Result<(), StoreError> {
        let mut state = write(&self.state);
        if let Some(reason) = &state.fail_on_update {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        let record = state
            .records
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        apply(record);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order) -> Result<(), StoreError> {
        self.store(order.id, order.clone())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.get(id))
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), StoreError> {
        self.modify(id, |order| order.status = status)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), StoreError> {
        self.store(payment.transaction_id, payment.clone())
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Payment>, StoreError> {
        Ok(self.get(id))
    }

    async fn update_status(
        &self,
        id: TransactionId,
        status: PaymentStatus,
    ) -> Result<(), StoreError> {
        self.modify(id, |payment| payment.status = status)
    }
}

#[async_trait]
impl ShipmentRepository for InMemoryShipmentRepository {
    async fn save(&self, shipment: &Shipment) -> Result<(), StoreError> {
        self.store(shipment.id, shipment.clone())
    }

    async fn find_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError> {
        Ok(self.get(id))
    }

    async fn update_status(
        &self,
        id: ShipmentId,
        status: ShipmentStatus,
    ) -> Result<(), StoreError> {
        self.modify(id, |shipment| shipment.status = status)
    }
}
