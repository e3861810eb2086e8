//! In-memory shipping carrier and notifier.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;

use super::{read, write};
use crate::shipping::{Address, CarrierError, NotifyError, Notifier, ShippingCarrier};

#[derive(Debug, Default)]
struct CarrierState {
    bookings: HashMap<String, OrderId>,
    cancellations: Vec<String>,
    next_id: u32,
    fail_on_book: Option<String>,
    fail_on_cancel: Option<String>,
}

/// In-memory shipping carrier for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShippingCarrier {
    state: Arc<RwLock<CarrierState>>,
}

impl InMemoryShippingCarrier {
    /// Creates a new in-memory carrier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every subsequent booking with `reason`.
    pub fn fail_on_book(&self, reason: impl Into<String>) {
        write(&self.state).fail_on_book = Some(reason.into());
    }

    /// Fails every subsequent cancellation with `reason`.
    pub fn fail_on_cancel(&self, reason: impl Into<String>) {
        write(&self.state).fail_on_cancel = Some(reason.into());
    }

    /// Returns the number of active bookings.
    pub fn booking_count(&self) -> usize {
        read(&self.state).bookings.len()
    }

    /// Returns the tracking numbers cancelled so far, in order.
    pub fn cancellations(&self) -> Vec<String> {
        read(&self.state).cancellations.clone()
    }
}

#[async_trait]
impl ShippingCarrier for InMemoryShippingCarrier {
    async fn book(&self, order_id: OrderId, _address: &Address) -> Result<String, CarrierError> {
        let mut state = write(&self.state);
        if let Some(reason) = &state.fail_on_book {
            return Err(CarrierError::Rejected(reason.clone()));
        }
        state.next_id += 1;
        let tracking_number = format!("TRACK-{:04}", state.next_id);
        state.bookings.insert(tracking_number.clone(), order_id);
        Ok(tracking_number)
    }

    async fn cancel(&self, tracking_number: &str) -> Result<(), CarrierError> {
        let mut state = write(&self.state);
        if let Some(reason) = &state.fail_on_cancel {
            return Err(CarrierError::CancellationFailed {
                tracking_number: tracking_number.to_string(),
                reason: reason.clone(),
            });
        }
        state.bookings.remove(tracking_number);
        state.cancellations.push(tracking_number.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct NotifierState {
    sent: Vec<(String, String)>,
    fail_with: Option<String>,
}

/// Notifier that records every message instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<RwLock<NotifierState>>,
}

impl RecordingNotifier {
    /// Creates a new recording notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every subsequent notification with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        write(&self.state).fail_with = Some(reason.into());
    }

    /// Returns the `(recipient, message)` pairs sent so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        read(&self.state).sent.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, recipient: &str, message: &str) -> Result<(), NotifyError> {
        let mut state = write(&self.state);
        if let Some(reason) = &state.fail_with {
            return Err(NotifyError {
                recipient: recipient.to_string(),
                reason: reason.clone(),
            });
        }
        state.sent.push((recipient.to_string(), message.to_string()));
        Ok(())
    }
}
