//! Saga lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a saga run is in its lifecycle.
///
/// ```text
/// NotStarted ──► Running ──┬──► Succeeded
///                          └──► Compensating ──► Compensated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SagaState {
    #[default]
    NotStarted,
    /// Steps are executing in order.
    Running,
    /// A step failed and the reverse sweep is in progress.
    Compensating,
    /// Every step completed.
    Succeeded,
    /// The sweep finished after a failure, whether or not every
    /// compensation succeeded.
    Compensated,
}

impl SagaState {
    /// Returns true if the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: SagaState) -> bool {
        use SagaState::*;
        matches!(
            (self, next),
            (NotStarted, Running)
                | (Running, Succeeded)
                | (Running, Compensating)
                | (Compensating, Compensated)
        )
    }

    /// Moves to `next`, or reports why the lifecycle forbids it.
    pub fn transition_to(self, next: SagaState) -> Result<SagaState, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition::new(self, next.as_str()))
        }
    }

    /// Returns true once no further events can be recorded.
    pub fn is_terminal(self) -> bool {
        matches!(self, SagaState::Succeeded | SagaState::Compensated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SagaState::NotStarted => "NotStarted",
            SagaState::Running => "Running",
            SagaState::Compensating => "Compensating",
            SagaState::Succeeded => "Succeeded",
            SagaState::Compensated => "Compensated",
        }
    }
}

impl fmt::Display for SagaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A journal entry that the saga's current state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{event} is not valid while the saga is {state}")]
pub struct InvalidTransition {
    pub state: SagaState,
    pub event: &'static str,
}

impl InvalidTransition {
    pub fn new(state: SagaState, event: &'static str) -> Self {
        Self { state, event }
    }
}
