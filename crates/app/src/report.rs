//! Serialisable summary of a fulfillment run.

use common::{EntityId, OrderId};
use saga::{FulfillmentRun, SagaOutcome, SagaState};
use serde::Serialize;

/// What the binary prints after a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub saga_id: EntityId,
    pub saga_type: &'static str,
    pub state: SagaState,
    pub completed_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub compensations: Vec<String>,
    pub compensation_failures: Vec<String>,
    /// False when a compensation failed or the failed step left a side
    /// effect behind, so state may be inconsistent.
    pub clean: bool,
    pub journal_events: usize,
    pub duration_ms: f64,
}

impl From<&FulfillmentRun> for RunSummary {
    fn from(run: &FulfillmentRun) -> Self {
        let mut summary = Self {
            saga_id: run.saga_id,
            saga_type: run.saga_type,
            state: run.state(),
            completed_steps: run.completed_steps().to_vec(),
            order_id: None,
            tracking_number: None,
            failed_step: None,
            error: None,
            compensations: Vec::new(),
            compensation_failures: Vec::new(),
            clean: true,
            journal_events: run.events.len(),
            duration_ms: run.duration.as_secs_f64() * 1000.0,
        };

        match &run.outcome {
            SagaOutcome::Succeeded(fulfillment) => {
                summary.order_id = fulfillment.order.as_ref().map(|order| order.id);
                summary.tracking_number = fulfillment
                    .shipment
                    .as_ref()
                    .map(|shipment| shipment.tracking_number.clone());
            }
            SagaOutcome::Failed(failure) => {
                summary.failed_step = Some(failure.step);
                summary.error = Some(failure.error.to_string());
                summary.compensations = failure
                    .compensated
                    .iter()
                    .map(|record| record.description.clone())
                    .collect();
                summary.compensation_failures = failure
                    .compensation_failures
                    .iter()
                    .map(|f| format!("{}: {}", f.step, f.error))
                    .collect();
                summary.clean = failure.is_clean() && !failure.error.left_residue();
            }
        }

        summary
    }
}
