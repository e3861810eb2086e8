//! Order fulfillment saga: create order → process payment → create shipment.

use async_trait::async_trait;
use common::CustomerId;
use domain::{
    Address, Order, OrderItem, Payment, PaymentError, PaymentMethod, Shipment, TOTAL_OUT_OF_RANGE,
};
use serde::{Deserialize, Serialize};

use crate::coordinator::FulfillmentContext;
use crate::error::FulfillmentError;
use crate::step::SagaStep;

/// The saga type identifier for order fulfillment.
pub const SAGA_TYPE: &str = "OrderFulfillment";

/// Step name: Place the order.
pub const STEP_CREATE_ORDER: &str = "create_order";

/// Step name: Process payment for the order.
pub const STEP_PROCESS_PAYMENT: &str = "process_payment";

/// Step name: Create shipment for the order.
pub const STEP_CREATE_SHIPMENT: &str = "create_shipment";

/// Reason recorded on orders cancelled by a rollback.
pub const ROLLBACK_REASON: &str = "fulfillment rolled back";

/// Everything needed to fulfill one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentRequest {
    pub customer_id: CustomerId,
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    pub shipping_address: Address,
}

impl FulfillmentRequest {
    /// Creates a new fulfillment request.
    pub fn new(
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        payment_method: PaymentMethod,
        shipping_address: Address,
    ) -> Self {
        Self {
            customer_id,
            items,
            payment_method,
            shipping_address,
        }
    }
}

/// The value threaded through the fulfillment steps.
///
/// Each step returns a copy enriched with the entity it created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fulfillment {
    pub request: FulfillmentRequest,
    pub order: Option<Order>,
    pub payment: Option<Payment>,
    pub shipment: Option<Shipment>,
}

impl Fulfillment {
    /// Starts a fulfillment with nothing created yet.
    pub fn new(request: FulfillmentRequest) -> Self {
        Self {
            request,
            order: None,
            payment: None,
            shipment: None,
        }
    }

    fn order_for(&self, step: &'static str) -> Result<&Order, FulfillmentError> {
        self.order
            .as_ref()
            .ok_or(FulfillmentError::MissingStepResult {
                step,
                needs: "order",
            })
    }

    fn payment_for(&self, step: &'static str) -> Result<&Payment, FulfillmentError> {
        self.payment
            .as_ref()
            .ok_or(FulfillmentError::MissingStepResult {
                step,
                needs: "payment",
            })
    }

    fn shipment_for(&self, step: &'static str) -> Result<&Shipment, FulfillmentError> {
        self.shipment
            .as_ref()
            .ok_or(FulfillmentError::MissingStepResult {
                step,
                needs: "shipment",
            })
    }
}

/// Places the order. Compensated by cancelling it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOrderStep;

#[async_trait]
impl SagaStep<FulfillmentContext, Fulfillment, FulfillmentError> for CreateOrderStep {
    fn name(&self) -> &'static str {
        STEP_CREATE_ORDER
    }

    async fn execute(
        &self,
        ctx: &FulfillmentContext,
        input: &Fulfillment,
    ) -> Result<Fulfillment, FulfillmentError> {
        let order = ctx
            .orders
            .place_order(input.request.customer_id, input.request.items.clone())
            .await?;
        Ok(Fulfillment {
            order: Some(order),
            ..input.clone()
        })
    }

    async fn compensate(
        &self,
        ctx: &FulfillmentContext,
        output: &Fulfillment,
    ) -> Option<Result<(), FulfillmentError>> {
        Some(cancel_order(ctx, output).await)
    }

    fn compensation_description(&self) -> String {
        "order cancelled".to_string()
    }
}

/// Charges the order total. Compensated by refunding the payment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessPaymentStep;

#[async_trait]
impl SagaStep<FulfillmentContext, Fulfillment, FulfillmentError> for ProcessPaymentStep {
    fn name(&self) -> &'static str {
        STEP_PROCESS_PAYMENT
    }

    async fn execute(
        &self,
        ctx: &FulfillmentContext,
        input: &Fulfillment,
    ) -> Result<Fulfillment, FulfillmentError> {
        let order = input.order_for(STEP_PROCESS_PAYMENT)?;
        let amount = order
            .total_amount()
            .ok_or_else(|| PaymentError::Validation(TOTAL_OUT_OF_RANGE.to_string()))?;
        let payment = ctx
            .payments
            .process_payment(order.id, amount, input.request.payment_method.clone())
            .await?;
        Ok(Fulfillment {
            payment: Some(payment),
            ..input.clone()
        })
    }

    async fn compensate(
        &self,
        ctx: &FulfillmentContext,
        output: &Fulfillment,
    ) -> Option<Result<(), FulfillmentError>> {
        Some(refund_payment(ctx, output).await)
    }

    fn compensation_description(&self) -> String {
        "payment refunded".to_string()
    }
}

/// Books the shipment. Compensated by cancelling the booking.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateShipmentStep;

#[async_trait]
impl SagaStep<FulfillmentContext, Fulfillment, FulfillmentError> for CreateShipmentStep {
    fn name(&self) -> &'static str {
        STEP_CREATE_SHIPMENT
    }

    async fn execute(
        &self,
        ctx: &FulfillmentContext,
        input: &Fulfillment,
    ) -> Result<Fulfillment, FulfillmentError> {
        let order = input.order_for(STEP_CREATE_SHIPMENT)?;
        let shipment = ctx
            .shipping
            .create_shipment(order.id, input.request.shipping_address.clone())
            .await?;
        Ok(Fulfillment {
            shipment: Some(shipment),
            ..input.clone()
        })
    }

    async fn compensate(
        &self,
        ctx: &FulfillmentContext,
        output: &Fulfillment,
    ) -> Option<Result<(), FulfillmentError>> {
        Some(cancel_shipment(ctx, output).await)
    }

    fn compensation_description(&self) -> String {
        "shipment cancelled".to_string()
    }
}

async fn cancel_order(
    ctx: &FulfillmentContext,
    output: &Fulfillment,
) -> Result<(), FulfillmentError> {
    let order = output.order_for(STEP_CREATE_ORDER)?;
    ctx.orders.cancel_order(order.id, ROLLBACK_REASON).await?;
    Ok(())
}

async fn refund_payment(
    ctx: &FulfillmentContext,
    output: &Fulfillment,
) -> Result<(), FulfillmentError> {
    let payment = output.payment_for(STEP_PROCESS_PAYMENT)?;
    ctx.payments.refund_payment(payment.transaction_id).await?;
    Ok(())
}

async fn cancel_shipment(
    ctx: &FulfillmentContext,
    output: &Fulfillment,
) -> Result<(), FulfillmentError> {
    let shipment = output.shipment_for(STEP_CREATE_SHIPMENT)?;
    ctx.shipping.cancel_shipment(shipment.id).await?;
    Ok(())
}
