//! Saga instance rebuilt from its journal.

use common::EntityId;
use serde::{Deserialize, Serialize};

use crate::events::SagaEvent;
use crate::state::{InvalidTransition, SagaState};

/// A view of one saga run, folded from the events it recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SagaInstance {
    id: Option<EntityId>,
    saga_type: String,
    state: SagaState,
    step_count: usize,
    current_step: Option<usize>,
    completed_steps: Vec<String>,
    failed_step: Option<String>,
    compensated_steps: Vec<String>,
    failed_compensations: Vec<String>,
    /// Reason for failure, if any.
    failure_reason: Option<String>,
}

impl SagaInstance {
    /// Rebuilds an instance by applying every event in order.
    pub fn replay<'a>(
        events: impl IntoIterator<Item = &'a SagaEvent>,
    ) -> Result<Self, InvalidTransition> {
        let mut instance = Self::default();
        for event in events {
            instance.apply(event)?;
        }
        Ok(instance)
    }

    /// Applies a single journal event.
    ///
    /// Rejects events the current state does not allow and leaves the
    /// instance untouched when it does.
    pub fn apply(&mut self, event: &SagaEvent) -> Result<(), InvalidTransition> {
        match event {
            SagaEvent::SagaStarted(data) => {
                self.enter(SagaState::Running, event)?;
                self.id = Some(data.saga_id);
                self.saga_type = data.saga_type.clone();
                self.step_count = data.step_count;
            }
            SagaEvent::StepStarted(data) => {
                self.expect(SagaState::Running, event)?;
                self.current_step = Some(data.index);
            }
            SagaEvent::StepCompleted(data) => {
                self.expect(SagaState::Running, event)?;
                self.completed_steps.push(data.step_name.clone());
            }
            SagaEvent::StepFailed(data) => {
                self.expect(SagaState::Running, event)?;
                self.failed_step = Some(data.step_name.clone());
                self.failure_reason = Some(data.error.clone());
            }
            SagaEvent::CompensationStarted(_) => {
                self.enter(SagaState::Compensating, event)?;
            }
            SagaEvent::CompensationStepCompleted(data) => {
                self.expect(SagaState::Compensating, event)?;
                self.compensated_steps.push(data.step_name.clone());
            }
            SagaEvent::CompensationStepFailed(data) => {
                self.expect(SagaState::Compensating, event)?;
                self.failed_compensations.push(data.step_name.clone());
            }
            SagaEvent::CompensationStepSkipped(_) => {
                self.expect(SagaState::Compensating, event)?;
            }
            SagaEvent::SagaCompleted(_) => {
                self.enter(SagaState::Succeeded, event)?;
                self.current_step = None;
            }
            SagaEvent::SagaFailed(data) => {
                self.enter(SagaState::Compensated, event)?;
                self.current_step = None;
                self.failure_reason = Some(data.reason.clone());
            }
        }
        Ok(())
    }

    fn enter(&mut self, next: SagaState, event: &SagaEvent) -> Result<(), InvalidTransition> {
        self.state = self
            .state
            .transition_to(next)
            .map_err(|_| InvalidTransition::new(self.state, event.event_type()))?;
        Ok(())
    }

    fn expect(&self, state: SagaState, event: &SagaEvent) -> Result<(), InvalidTransition> {
        if self.state == state {
            Ok(())
        } else {
            Err(InvalidTransition::new(self.state, event.event_type()))
        }
    }
}

// Query methods
impl SagaInstance {
    /// Returns the saga run ID.
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Returns the saga state.
    pub fn state(&self) -> SagaState {
        self.state
    }

    /// Returns the saga type.
    pub fn saga_type(&self) -> &str {
        &self.saga_type
    }

    /// Returns the number of declared steps.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the index of the step in flight, if any.
    pub fn current_step(&self) -> Option<usize> {
        self.current_step
    }

    /// Returns the list of completed step names.
    pub fn completed_steps(&self) -> &[String] {
        &self.completed_steps
    }

    /// Returns the step that failed, if any.
    pub fn failed_step(&self) -> Option<&str> {
        self.failed_step.as_deref()
    }

    /// Returns the steps whose compensation succeeded, in sweep order.
    pub fn compensated_steps(&self) -> &[String] {
        &self.compensated_steps
    }

    /// Returns the steps whose compensation failed, in sweep order.
    pub fn failed_compensations(&self) -> &[String] {
        &self.failed_compensations
    }

    /// Returns the failure reason, if any.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAGA_TYPE: &str = "OrderFulfillment";

    #[test]
    fn test_default_saga_instance() {
        let saga = SagaInstance::default();
        assert!(saga.id().is_none());
        assert_eq!(saga.state(), SagaState::NotStarted);
        assert!(saga.completed_steps().is_empty());
    }

    #[test]
    fn test_apply_saga_started() {
        let saga_id = EntityId::new();
        let saga =
            SagaInstance::replay(&[SagaEvent::saga_started(saga_id, SAGA_TYPE, 3)]).unwrap();

        assert_eq!(saga.id(), Some(saga_id));
        assert_eq!(saga.saga_type(), SAGA_TYPE);
        assert_eq!(saga.step_count(), 3);
        assert_eq!(saga.state(), SagaState::Running);
    }

    #[test]
    fn test_apply_step_lifecycle() {
        let mut saga = SagaInstance::default();
        saga.apply(&SagaEvent::saga_started(EntityId::new(), SAGA_TYPE, 2))
            .unwrap();

        saga.apply(&SagaEvent::step_started(0, "create_order")).unwrap();
        assert_eq!(saga.current_step(), Some(0));
        saga.apply(&SagaEvent::step_completed(0, "create_order")).unwrap();
        assert_eq!(saga.completed_steps(), &["create_order"]);

        saga.apply(&SagaEvent::step_started(1, "process_payment")).unwrap();
        assert_eq!(saga.current_step(), Some(1));
        saga.apply(&SagaEvent::step_completed(1, "process_payment")).unwrap();

        saga.apply(&SagaEvent::saga_completed()).unwrap();
        assert_eq!(saga.state(), SagaState::Succeeded);
        assert!(saga.state().is_terminal());
        assert_eq!(saga.current_step(), None);
        assert_eq!(saga.completed_steps().len(), 2);
    }

    #[test]
    fn test_apply_step_failure_and_compensation() {
        let saga = SagaInstance::replay(&[
            SagaEvent::saga_started(EntityId::new(), SAGA_TYPE, 3),
            SagaEvent::step_started(0, "create_order"),
            SagaEvent::step_completed(0, "create_order"),
            SagaEvent::step_started(1, "process_payment"),
            SagaEvent::step_failed(1, "process_payment", "card declined"),
            SagaEvent::compensation_started("process_payment", 1),
        ])
        .unwrap();
        assert_eq!(saga.state(), SagaState::Compensating);
        assert_eq!(saga.failed_step(), Some("process_payment"));
        assert_eq!(saga.failure_reason(), Some("card declined"));

        let mut saga = saga;
        saga.apply(&SagaEvent::compensation_step_completed(
            0,
            "create_order",
            "order cancelled",
        ))
        .unwrap();
        saga.apply(&SagaEvent::saga_failed("card declined", 0)).unwrap();

        assert_eq!(saga.state(), SagaState::Compensated);
        assert_eq!(saga.compensated_steps(), &["create_order"]);
        assert!(saga.failed_compensations().is_empty());
    }

    #[test]
    fn test_compensation_step_failure_does_not_change_state() {
        let mut saga = SagaInstance::replay(&[
            SagaEvent::saga_started(EntityId::new(), SAGA_TYPE, 2),
            SagaEvent::step_started(0, "create_order"),
            SagaEvent::step_completed(0, "create_order"),
            SagaEvent::step_failed(1, "process_payment", "error"),
            SagaEvent::compensation_started("process_payment", 1),
        ])
        .unwrap();

        saga.apply(&SagaEvent::compensation_step_failed(
            0,
            "create_order",
            "store unavailable",
        ))
        .unwrap();

        assert_eq!(saga.state(), SagaState::Compensating);
        assert_eq!(saga.failed_compensations(), &["create_order"]);
    }

    #[test]
    fn test_serialization() {
        let saga_id = EntityId::new();
        let saga = SagaInstance::replay(&[
            SagaEvent::saga_started(saga_id, SAGA_TYPE, 3),
            SagaEvent::step_started(0, "create_order"),
            SagaEvent::step_completed(0, "create_order"),
        ])
        .unwrap();

        let json = serde_json::to_string(&saga).unwrap();
        let deserialized: SagaInstance = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, saga);
        assert_eq!(deserialized.id(), Some(saga_id));
        assert_eq!(deserialized.state(), SagaState::Running);
    }

    #[test]
    fn test_events_out_of_lifecycle_are_rejected() {
        let mut saga = SagaInstance::default();
        let err = saga
            .apply(&SagaEvent::step_started(0, "create_order"))
            .unwrap_err();
        assert_eq!(err, InvalidTransition::new(SagaState::NotStarted, "StepStarted"));
        assert_eq!(saga, SagaInstance::default());

        let err = SagaInstance::replay(&[
            SagaEvent::saga_started(EntityId::new(), SAGA_TYPE, 1),
            SagaEvent::saga_completed(),
            SagaEvent::compensation_started("create_order", 1),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            InvalidTransition::new(SagaState::Succeeded, "CompensationStarted")
        );
    }

    #[test]
    fn test_compensation_events_require_a_started_sweep() {
        let mut saga = SagaInstance::replay(&[
            SagaEvent::saga_started(EntityId::new(), SAGA_TYPE, 1),
            SagaEvent::step_started(0, "create_order"),
            SagaEvent::step_completed(0, "create_order"),
        ])
        .unwrap();

        let err = saga
            .apply(&SagaEvent::saga_failed("create_order failed", 0))
            .unwrap_err();
        assert_eq!(err.state, SagaState::Running);
        assert!(saga.compensated_steps().is_empty());
        assert_eq!(saga.state(), SagaState::Running);
    }
}
