//! In-memory payment gateway.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Money, TransactionId};

use super::{read, write};
use crate::payment::{GatewayError, PaymentGateway, PaymentMethod};

#[derive(Debug, Default)]
struct GatewayState {
    charges: HashMap<TransactionId, Money>,
    reversals: Vec<TransactionId>,
    fail_on_perform: Option<String>,
    fail_on_reverse: Option<String>,
}

/// In-memory payment gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<GatewayState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declines every subsequent charge with `reason`.
    pub fn fail_on_perform(&self, reason: impl Into<String>) {
        write(&self.state).fail_on_perform = Some(reason.into());
    }

    /// Fails every subsequent reversal with `reason`.
    pub fn fail_on_reverse(&self, reason: impl Into<String>) {
        write(&self.state).fail_on_reverse = Some(reason.into());
    }

    /// Returns the number of charges not yet reversed.
    pub fn active_charge_count(&self) -> usize {
        read(&self.state).charges.len()
    }

    /// Returns the transactions reversed so far, in order.
    pub fn reversals(&self) -> Vec<TransactionId> {
        read(&self.state).reversals.clone()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn perform(
        &self,
        amount: Money,
        _method: &PaymentMethod,
    ) -> Result<TransactionId, GatewayError> {
        let mut state = write(&self.state);
        if let Some(reason) = &state.fail_on_perform {
            return Err(GatewayError::Declined(reason.clone()));
        }
        let transaction_id = TransactionId::new();
        state.charges.insert(transaction_id, amount);
        Ok(transaction_id)
    }

    async fn reverse(
        &self,
        transaction_id: TransactionId,
        amount: Money,
    ) -> Result<(), GatewayError> {
        let mut state = write(&self.state);
        if let Some(reason) = &state.fail_on_reverse {
            return Err(GatewayError::ReversalFailed {
                transaction_id,
                reason: reason.clone(),
            });
        }
        match state.charges.get(&transaction_id).copied() {
            Some(charged) if charged == amount => {
                state.charges.remove(&transaction_id);
                state.reversals.push(transaction_id);
                Ok(())
            }
            Some(charged) => Err(GatewayError::ReversalFailed {
                transaction_id,
                reason: format!("amount {amount} does not match charge of {charged}"),
            }),
            None => Err(GatewayError::ReversalFailed {
                transaction_id,
                reason: "unknown transaction".to_string(),
            }),
        }
    }
}
