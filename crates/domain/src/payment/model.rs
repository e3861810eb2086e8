//! Payment entity and value objects.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, TransactionId};
use serde::{Deserialize, Serialize};

/// How the customer pays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    Card { last4: String },
    BankTransfer { iban: String },
    Wallet { provider: String },
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Card { last4 } => write!(f, "card ****{last4}"),
            PaymentMethod::BankTransfer { iban } => write!(f, "bank transfer {iban}"),
            PaymentMethod::Wallet { provider } => write!(f, "{provider} wallet"),
        }
    }
}

/// Lifecycle of a captured payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Captured,
    Refunded,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Captured => write!(f, "Captured"),
            PaymentStatus::Refunded => write!(f, "Refunded"),
        }
    }
}

/// A payment captured for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub transaction_id: TransactionId,
    pub order_id: OrderId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub captured_at: DateTime<Utc>,
}
