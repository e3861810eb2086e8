//! Saga step descriptors.

use async_trait::async_trait;

/// A step in a saga that can be executed and compensated.
///
/// Each step turns the value produced by the previous step (or the saga
/// input) into a new value. When a later step fails, the step is asked to
/// undo its effect given the value it produced.
///
/// # Type Parameters
///
/// - `C`: Shared context providing dependencies (facades), never mutated
/// - `V`: The value threaded from step to step
/// - `E`: The error type for step and compensation failures
#[async_trait]
pub trait SagaStep<C, V, E>: Send + Sync
where
    C: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: Send + 'static,
{
    /// Human-readable name for logging and error messages.
    fn name(&self) -> &'static str;

    /// Execute the step, producing the value handed to the next step.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails to complete. The saga then
    /// compensates every step that completed before this one.
    async fn execute(&self, ctx: &C, input: &V) -> Result<V, E>;

    /// Undo the step's effects given the value it produced.
    ///
    /// Returns `None` when the step has nothing to undo. That is the default,
    /// suitable for read-only steps, and the sweep records such steps as
    /// skipped. Overriding this method is all it takes to make a step
    /// compensable.
    ///
    /// # Errors
    ///
    /// `Some(Err(_))` when the undo fails. The sweep continues anyway.
    async fn compensate(&self, ctx: &C, output: &V) -> Option<Result<(), E>> {
        let _ = (ctx, output);
        None
    }

    /// Human-readable description of what compensation does.
    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}
