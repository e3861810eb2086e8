//! Public entry point of the payment domain.

use capability::{Facade, Scope};
use common::{Money, OrderId, TransactionId};

use super::{Payment, PaymentBundle, PaymentError, PaymentMethod, ProcessPayment, RefundPayment};

/// Facade over the payment bundle.
#[derive(Debug)]
pub struct PaymentFacade {
    inner: Facade<PaymentBundle>,
}

impl PaymentFacade {
    /// Creates a facade under an empty root scope.
    pub fn new(bundle: PaymentBundle) -> Self {
        Self {
            inner: Facade::new(bundle),
        }
    }

    /// Creates a facade whose call scopes extend `root`.
    pub fn with_root(root: Scope, bundle: PaymentBundle) -> Self {
        Self {
            inner: Facade::with_root(root, bundle),
        }
    }

    /// Charges `amount` for an order.
    #[tracing::instrument(skip(self, method))]
    pub async fn process_payment(
        &self,
        order_id: OrderId,
        amount: Money,
        method: PaymentMethod,
    ) -> Result<Payment, PaymentError> {
        self.inner
            .execute(ProcessPayment::new(order_id, amount, method))
            .await
    }

    /// Refunds a captured payment.
    #[tracing::instrument(skip(self))]
    pub async fn refund_payment(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Payment, PaymentError> {
        self.inner.execute(RefundPayment { transaction_id }).await
    }
}
