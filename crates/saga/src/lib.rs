//! Saga orchestration with compensating transactions.
//!
//! A [`Saga`] is a declarative list of [`SagaStep`]s interpreted by one
//! generic loop:
//! 1. Steps run in declared order; each receives the value produced by the
//!    previous step (the first receives the saga input).
//! 2. When a step fails, the compensations of every previously completed
//!    step run in reverse completion order. The failed step's own
//!    compensation never runs.
//! 3. Compensation is best effort: a failing compensation is recorded and the
//!    sweep continues.
//!
//! [`OrderFulfillment`] wires the loop to the order, payment and shipping
//! facades: create order → process payment → create shipment.

pub mod coordinator;
pub mod error;
pub mod events;
pub mod instance;
pub mod order_fulfillment;
pub mod outcome;
pub mod saga;
pub mod state;
pub mod step;

pub use coordinator::{
    FulfillmentContext, FulfillmentRun, FulfillmentSaga, OrderFulfillment, fulfillment_saga,
};
pub use error::FulfillmentError;
pub use events::SagaEvent;
pub use instance::SagaInstance;
pub use order_fulfillment::{
    CreateOrderStep, CreateShipmentStep, Fulfillment, FulfillmentRequest, ProcessPaymentStep,
};
pub use outcome::{CompensationFailure, CompensationRecord, SagaFailure, SagaOutcome, SagaRun};
pub use saga::{Saga, SagaBuilder};
pub use state::{InvalidTransition, SagaState};
pub use step::SagaStep;
