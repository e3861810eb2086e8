//! Terminal outcomes of a saga run.

use std::fmt;
use std::time::Duration;

use common::EntityId;

use crate::events::SagaEvent;
use crate::instance::SagaInstance;
use crate::state::SagaState;

/// A compensation that ran successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompensationRecord {
    /// Index of the compensated step.
    pub index: usize,
    pub step: &'static str,
    /// What the compensation undid.
    pub description: String,
}

/// A compensation that itself failed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompensationFailure<E> {
    pub index: usize,
    pub step: &'static str,
    pub error: E,
}

/// The step failure that ended a saga, with the result of the sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SagaFailure<E> {
    /// Index of the step that failed.
    pub index: usize,
    /// Name of the step that failed.
    pub step: &'static str,
    /// The triggering error.
    pub error: E,
    /// Compensations that succeeded, in the order they ran.
    pub compensated: Vec<CompensationRecord>,
    /// Compensations that failed, in the order they ran.
    pub compensation_failures: Vec<CompensationFailure<E>>,
}

impl<E> SagaFailure<E> {
    /// Returns true if every attempted compensation succeeded.
    pub fn is_clean(&self) -> bool {
        self.compensation_failures.is_empty()
    }

    /// Returns the descriptions of the compensations that ran.
    pub fn compensation_descriptions(&self) -> Vec<&str> {
        self.compensated
            .iter()
            .map(|record| record.description.as_str())
            .collect()
    }
}

impl<E: fmt::Display> fmt::Display for SagaFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step '{}' failed: {}", self.step, self.error)?;
        if !self.is_clean() {
            write!(
                f,
                " ({} compensation(s) failed)",
                self.compensation_failures.len()
            )?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for SagaFailure<E> {}

/// The terminal outcome of a saga. There are no partial states.
#[derive(Debug, Clone, PartialEq)]
pub enum SagaOutcome<V, E> {
    /// Every step succeeded; holds the last step's value.
    Succeeded(V),

    /// A step failed and the compensation sweep finished.
    Failed(SagaFailure<E>),
}

impl<V, E> SagaOutcome<V, E> {
    /// Returns true if the saga succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, SagaOutcome::Succeeded(_))
    }

    /// Returns the final value, if the saga succeeded.
    pub fn value(&self) -> Option<&V> {
        match self {
            SagaOutcome::Succeeded(value) => Some(value),
            SagaOutcome::Failed(_) => None,
        }
    }

    /// Returns the failure, if the saga failed.
    pub fn failure(&self) -> Option<&SagaFailure<E>> {
        match self {
            SagaOutcome::Succeeded(_) => None,
            SagaOutcome::Failed(failure) => Some(failure),
        }
    }

    /// Converts the outcome into a `Result`.
    pub fn into_result(self) -> Result<V, SagaFailure<E>> {
        match self {
            SagaOutcome::Succeeded(value) => Ok(value),
            SagaOutcome::Failed(failure) => Err(failure),
        }
    }
}

/// Report of one saga run.
#[derive(Debug, Clone)]
pub struct SagaRun<V, E> {
    pub saga_id: EntityId,
    pub saga_type: &'static str,
    pub outcome: SagaOutcome<V, E>,
    /// Every transition, in the order it happened.
    pub events: Vec<SagaEvent>,
    /// State folded from `events`.
    pub instance: SagaInstance,
    pub duration: Duration,
}

impl<V, E> SagaRun<V, E> {
    /// Returns the terminal state.
    pub fn state(&self) -> SagaState {
        self.instance.state()
    }

    /// Returns the names of the steps that completed, in order.
    pub fn completed_steps(&self) -> &[String] {
        self.instance.completed_steps()
    }

    /// Returns true if the saga succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(compensation_failures: Vec<CompensationFailure<String>>) -> SagaFailure<String> {
        SagaFailure {
            index: 2,
            step: "create_shipment",
            error: "shipment error".to_string(),
            compensated: vec![
                CompensationRecord {
                    index: 1,
                    step: "process_payment",
                    description: "payment refunded".to_string(),
                },
                CompensationRecord {
                    index: 0,
                    step: "create_order",
                    description: "order cancelled".to_string(),
                },
            ],
            compensation_failures,
        }
    }

    #[test]
    fn test_clean_failure() {
        let failure = failure(vec![]);
        assert!(failure.is_clean());
        assert_eq!(
            failure.compensation_descriptions(),
            vec!["payment refunded", "order cancelled"]
        );
        assert_eq!(
            failure.to_string(),
            "step 'create_shipment' failed: shipment error"
        );
    }

    #[test]
    fn test_failure_with_residual_inconsistency() {
        let failure = failure(vec![CompensationFailure {
            index: 1,
            step: "process_payment",
            error: "gateway down".to_string(),
        }]);
        assert!(!failure.is_clean());
        assert_eq!(
            failure.to_string(),
            "step 'create_shipment' failed: shipment error (1 compensation(s) failed)"
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: SagaOutcome<u32, String> = SagaOutcome::Succeeded(7);
        assert!(ok.is_success());
        assert_eq!(ok.value(), Some(&7));
        assert!(ok.failure().is_none());
        assert_eq!(ok.into_result(), Ok(7));

        let failed: SagaOutcome<u32, String> = SagaOutcome::Failed(failure(vec![]));
        assert!(!failed.is_success());
        assert!(failed.value().is_none());
        assert_eq!(failed.failure().map(|f| f.index), Some(2));
        assert!(failed.into_result().is_err());
    }
}
