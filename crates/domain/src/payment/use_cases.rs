//! Payment use cases.

use async_trait::async_trait;
use capability::{Requirements, Scope, UseCase};
use chrono::Utc;
use common::{Money, OrderId, TransactionId};
use serde_json::json;

use super::{
    Payment, PaymentError, PaymentGateway, PaymentMethod, PaymentRepository, PaymentStatus,
};
use crate::capabilities::{DomainEvent, EventPublisher, Logger};

/// Topic payment events are published on.
pub const PAYMENT_TOPIC: &str = "payments";

/// Captures a payment for an order.
///
/// A charge that cannot be recorded is reversed before the error is returned.
#[derive(Debug, Clone)]
pub struct ProcessPayment {
    pub order_id: OrderId,
    pub amount: Money,
    pub method: PaymentMethod,
}

impl ProcessPayment {
    /// Creates a new ProcessPayment command.
    pub fn new(order_id: OrderId, amount: Money, method: PaymentMethod) -> Self {
        Self {
            order_id,
            amount,
            method,
        }
    }
}

#[async_trait]
impl UseCase for ProcessPayment {
    type Output = Payment;
    type Error = PaymentError;
    const NAME: &'static str = "process_payment";

    fn requires() -> Requirements {
        Requirements::new()
            .require::<dyn PaymentGateway>()
            .require::<dyn PaymentRepository>()
            .require::<dyn EventPublisher>()
            .require::<dyn Logger>()
    }

    async fn run(self, scope: &Scope) -> Result<Payment, PaymentError> {
        let gateway = scope.resolve::<dyn PaymentGateway>()?;
        let repository = scope.resolve::<dyn PaymentRepository>()?;
        let events = scope.resolve::<dyn EventPublisher>()?;
        let logger = scope.resolve::<dyn Logger>()?;

        if !self.amount.is_positive() {
            return Err(PaymentError::Validation(format!(
                "Payment amount must be positive, got {}",
                self.amount
            )));
        }

        let transaction_id = gateway.perform(self.amount, &self.method).await?;
        let payment = Payment {
            transaction_id,
            order_id: self.order_id,
            amount: self.amount,
            method: self.method,
            status: PaymentStatus::Captured,
            captured_at: Utc::now(),
        };
        if let Err(store) = repository.save(&payment).await {
            logger.log(
                Self::NAME,
                &format!("reversing unrecorded charge {transaction_id}: {store}"),
            );
            return Err(match gateway.reverse(transaction_id, payment.amount).await {
                Ok(()) => PaymentError::Store(store),
                Err(reversal) => PaymentError::Unrecorded {
                    transaction_id,
                    store,
                    reversal,
                },
            });
        }

        events.publish(
            PAYMENT_TOPIC,
            DomainEvent::new(
                "PaymentCaptured",
                json!({
                    "transaction_id": payment.transaction_id,
                    "order_id": payment.order_id,
                    "amount_cents": payment.amount.cents(),
                }),
            ),
        );
        logger.log(
            Self::NAME,
            &format!(
                "captured {} for order {} via {}",
                payment.amount, payment.order_id, payment.method
            ),
        );

        Ok(payment)
    }
}

/// Reverses a captured payment.
#[derive(Debug, Clone, Copy)]
pub struct RefundPayment {
    pub transaction_id: TransactionId,
}

#[async_trait]
impl UseCase for RefundPayment {
    type Output = Payment;
    type Error = PaymentError;
    const NAME: &'static str = "refund_payment";

    fn requires() -> Requirements {
        Requirements::new()
            .require::<dyn PaymentGateway>()
            .require::<dyn PaymentRepository>()
            .require::<dyn EventPublisher>()
            .require::<dyn Logger>()
    }

    async fn run(self, scope: &Scope) -> Result<Payment, PaymentError> {
        let gateway = scope.resolve::<dyn PaymentGateway>()?;
        let repository = scope.resolve::<dyn PaymentRepository>()?;
        let events = scope.resolve::<dyn EventPublisher>()?;
        let logger = scope.resolve::<dyn Logger>()?;

        let mut payment = repository
            .find_by_id(self.transaction_id)
            .await?
            .ok_or(PaymentError::NotFound(self.transaction_id))?;

        if payment.status != PaymentStatus::Captured {
            return Err(PaymentError::InvalidStatus {
                transaction_id: payment.transaction_id,
                status: payment.status,
                action: "refund",
            });
        }

        gateway
            .reverse(payment.transaction_id, payment.amount)
            .await?;
        repository
            .update_status(payment.transaction_id, PaymentStatus::Refunded)
            .await?;
        payment.status = PaymentStatus::Refunded;

        events.publish(
            PAYMENT_TOPIC,
            DomainEvent::new(
                "PaymentRefunded",
                json!({
                    "transaction_id": payment.transaction_id,
                    "order_id": payment.order_id,
                }),
            ),
        );
        logger.log(
            Self::NAME,
            &format!(
                "refunded {} for order {}",
                payment.amount, payment.order_id
            ),
        );

        Ok(payment)
    }
}
