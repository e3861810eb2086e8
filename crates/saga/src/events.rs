//! Saga journal events.

use chrono::{DateTime, Utc};
use common::EntityId;
use serde::{Deserialize, Serialize};

/// Events recorded while a saga runs, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SagaEvent {
    /// Saga execution started.
    SagaStarted(SagaStartedData),

    /// A saga step started execution.
    StepStarted(StepData),

    /// A saga step completed successfully.
    StepCompleted(StepData),

    /// A saga step failed.
    StepFailed(StepFailedData),

    /// Compensation started after a step failure.
    CompensationStarted(CompensationData),

    /// A completed step was compensated.
    CompensationStepCompleted(CompensationStepData),

    /// A compensation failed (recorded, the sweep continues).
    CompensationStepFailed(StepFailedData),

    /// A completed step had no compensation to run.
    CompensationStepSkipped(StepData),

    /// Saga completed successfully.
    SagaCompleted(SagaCompletedData),

    /// Saga failed after the compensation sweep.
    SagaFailed(SagaFailedData),
}

impl SagaEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            SagaEvent::SagaStarted(_) => "SagaStarted",
            SagaEvent::StepStarted(_) => "StepStarted",
            SagaEvent::StepCompleted(_) => "StepCompleted",
            SagaEvent::StepFailed(_) => "StepFailed",
            SagaEvent::CompensationStarted(_) => "CompensationStarted",
            SagaEvent::CompensationStepCompleted(_) => "CompensationStepCompleted",
            SagaEvent::CompensationStepFailed(_) => "CompensationStepFailed",
            SagaEvent::CompensationStepSkipped(_) => "CompensationStepSkipped",
            SagaEvent::SagaCompleted(_) => "SagaCompleted",
            SagaEvent::SagaFailed(_) => "SagaFailed",
        }
    }
}

/// Data for SagaStarted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SagaStartedData {
    /// The saga run ID.
    pub saga_id: EntityId,
    /// The type of saga (e.g., "OrderFulfillment").
    pub saga_type: String,
    /// Number of declared steps.
    pub step_count: usize,
    /// When the saga started.
    pub started_at: DateTime<Utc>,
}

/// Identifies a step by position and name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepData {
    /// Zero-based position in the saga.
    pub index: usize,
    /// The step name.
    pub step_name: String,
}

/// Data for StepFailed and CompensationStepFailed events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFailedData {
    pub index: usize,
    pub step_name: String,
    /// Error message describing the failure.
    pub error: String,
}

/// Data for CompensationStarted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationData {
    /// The step that triggered compensation.
    pub from_step: String,
    /// How many completed steps the sweep visits.
    pub completed_steps: usize,
}

/// Data for CompensationStepCompleted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationStepData {
    pub index: usize,
    pub step_name: String,
    /// What the compensation undid (e.g., "payment refunded").
    pub description: String,
}

/// Data for SagaCompleted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SagaCompletedData {
    /// When the saga completed.
    pub completed_at: DateTime<Utc>,
}

/// Data for SagaFailed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SagaFailedData {
    /// Reason for failure.
    pub reason: String,
    /// Number of compensations that failed.
    pub compensation_failures: usize,
    /// When the saga failed.
    pub failed_at: DateTime<Utc>,
}

// Convenience constructors
impl SagaEvent {
    /// Creates a SagaStarted event.
    pub fn saga_started(saga_id: EntityId, saga_type: impl Into<String>, step_count: usize) -> Self {
        SagaEvent::SagaStarted(SagaStartedData {
            saga_id,
            saga_type: saga_type.into(),
            step_count,
            started_at: Utc::now(),
        })
    }

    /// Creates a StepStarted event.
    pub fn step_started(index: usize, step_name: impl Into<String>) -> Self {
        SagaEvent::StepStarted(StepData {
            index,
            step_name: step_name.into(),
        })
    }

    /// Creates a StepCompleted event.
    pub fn step_completed(index: usize, step_name: impl Into<String>) -> Self {
        SagaEvent::StepCompleted(StepData {
            index,
            step_name: step_name.into(),
        })
    }

    /// Creates a StepFailed event.
    pub fn step_failed(index: usize, step_name: impl Into<String>, error: impl Into<String>) -> Self {
        SagaEvent::StepFailed(StepFailedData {
            index,
            step_name: step_name.into(),
            error: error.into(),
        })
    }

    /// Creates a CompensationStarted event.
    pub fn compensation_started(from_step: impl Into<String>, completed_steps: usize) -> Self {
        SagaEvent::CompensationStarted(CompensationData {
            from_step: from_step.into(),
            completed_steps,
        })
    }

    /// Creates a CompensationStepCompleted event.
    pub fn compensation_step_completed(
        index: usize,
        step_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        SagaEvent::CompensationStepCompleted(CompensationStepData {
            index,
            step_name: step_name.into(),
            description: description.into(),
        })
    }

    /// Creates a CompensationStepFailed event.
    pub fn compensation_step_failed(
        index: usize,
        step_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        SagaEvent::CompensationStepFailed(StepFailedData {
            index,
            step_name: step_name.into(),
            error: error.into(),
        })
    }

    /// Creates a CompensationStepSkipped event.
    pub fn compensation_step_skipped(index: usize, step_name: impl Into<String>) -> Self {
        SagaEvent::CompensationStepSkipped(StepData {
            index,
            step_name: step_name.into(),
        })
    }

    /// Creates a SagaCompleted event.
    pub fn saga_completed() -> Self {
        SagaEvent::SagaCompleted(SagaCompletedData {
            completed_at: Utc::now(),
        })
    }

    /// Creates a SagaFailed event.
    pub fn saga_failed(reason: impl Into<String>, compensation_failures: usize) -> Self {
        SagaEvent::SagaFailed(SagaFailedData {
            reason: reason.into(),
            compensation_failures,
            failed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        assert_eq!(
            SagaEvent::saga_started(EntityId::new(), "OrderFulfillment", 3).event_type(),
            "SagaStarted"
        );
        assert_eq!(
            SagaEvent::step_started(0, "create_order").event_type(),
            "StepStarted"
        );
        assert_eq!(
            SagaEvent::step_completed(0, "create_order").event_type(),
            "StepCompleted"
        );
        assert_eq!(
            SagaEvent::step_failed(1, "process_payment", "card declined").event_type(),
            "StepFailed"
        );
        assert_eq!(
            SagaEvent::compensation_started("process_payment", 1).event_type(),
            "CompensationStarted"
        );
        assert_eq!(
            SagaEvent::compensation_step_completed(0, "create_order", "order cancelled")
                .event_type(),
            "CompensationStepCompleted"
        );
        assert_eq!(
            SagaEvent::compensation_step_failed(0, "create_order", "store down").event_type(),
            "CompensationStepFailed"
        );
        assert_eq!(
            SagaEvent::compensation_step_skipped(0, "audit").event_type(),
            "CompensationStepSkipped"
        );
        assert_eq!(SagaEvent::saga_completed().event_type(), "SagaCompleted");
        assert_eq!(
            SagaEvent::saga_failed("step failed", 0).event_type(),
            "SagaFailed"
        );
    }

    #[test]
    fn test_tagged_json_layout() {
        let event = SagaEvent::step_failed(2, "create_shipment", "shipment error");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "StepFailed");
        assert_eq!(json["data"]["index"], 2);
        assert_eq!(json["data"]["step_name"], "create_shipment");
        assert_eq!(json["data"]["error"], "shipment error");
    }

    #[test]
    fn test_saga_started_data() {
        let saga_id = EntityId::new();
        let event = SagaEvent::saga_started(saga_id, "OrderFulfillment", 3);

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: SagaEvent = serde_json::from_str(&json).unwrap();

        if let SagaEvent::SagaStarted(data) = deserialized {
            assert_eq!(data.saga_id, saga_id);
            assert_eq!(data.saga_type, "OrderFulfillment");
            assert_eq!(data.step_count, 3);
        } else {
            panic!("Expected SagaStarted event");
        }
    }
}
