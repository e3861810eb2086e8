//! Generic saga interpreter.

use std::fmt;
use std::time::Instant;

use common::EntityId;

use crate::events::SagaEvent;
use crate::instance::SagaInstance;
use crate::outcome::{
    CompensationFailure, CompensationRecord, SagaFailure, SagaOutcome, SagaRun,
};
use crate::step::SagaStep;

/// An ordered list of steps run by one generic loop.
pub struct Saga<C, V, E>
where
    C: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: Send + 'static,
{
    saga_type: &'static str,
    steps: Vec<Box<dyn SagaStep<C, V, E>>>,
}

/// Assembles a [`Saga`] from step descriptors.
pub struct SagaBuilder<C, V, E>
where
    C: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: Send + 'static,
{
    saga_type: &'static str,
    steps: Vec<Box<dyn SagaStep<C, V, E>>>,
}

impl<C, V, E> SagaBuilder<C, V, E>
where
    C: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: Send + 'static,
{
    /// Starts a saga of the given type with no steps.
    pub fn new(saga_type: &'static str) -> Self {
        Self {
            saga_type,
            steps: Vec::new(),
        }
    }

    /// Appends a step. Steps run in the order they are added.
    pub fn step(mut self, step: impl SagaStep<C, V, E> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Finishes the saga.
    pub fn build(self) -> Saga<C, V, E> {
        Saga {
            saga_type: self.saga_type,
            steps: self.steps,
        }
    }
}

/// A successfully executed step awaiting possible compensation.
struct Completed<'s, C, V, E>
where
    C: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: Send + 'static,
{
    index: usize,
    step: &'s dyn SagaStep<C, V, E>,
    value: V,
}

/// Event journal and the instance folded from it.
#[derive(Default)]
struct Journal {
    events: Vec<SagaEvent>,
    instance: SagaInstance,
}

impl Journal {
    fn record(&mut self, event: SagaEvent) {
        let applied = self.instance.apply(&event);
        debug_assert!(applied.is_ok(), "saga loop recorded {applied:?}");
        self.events.push(event);
    }
}

impl<C, V, E> Saga<C, V, E>
where
    C: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: Send + fmt::Display + 'static,
{
    /// Returns a builder for a saga of the given type.
    pub fn builder(saga_type: &'static str) -> SagaBuilder<C, V, E> {
        SagaBuilder::new(saga_type)
    }

    /// Returns the saga type name.
    pub fn saga_type(&self) -> &'static str {
        self.saga_type
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the saga has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the step names in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Runs every step in order, compensating on the first failure.
    ///
    /// Always reaches a terminal outcome. A saga with no steps succeeds with
    /// its input.
    #[tracing::instrument(skip_all, fields(saga_type = self.saga_type))]
    pub async fn run(&self, ctx: &C, input: V) -> SagaRun<V, E> {
        metrics::counter!("saga_executions_total", "saga_type" => self.saga_type).increment(1);
        let started = Instant::now();
        let saga_id = EntityId::new();

        let mut journal = Journal::default();
        journal.record(SagaEvent::saga_started(
            saga_id,
            self.saga_type,
            self.steps.len(),
        ));

        let mut completed: Vec<Completed<'_, C, V, E>> = Vec::with_capacity(self.steps.len());
        let mut failure = None;

        for (index, step) in self.steps.iter().enumerate() {
            let step = step.as_ref();
            tracing::info!(%saga_id, index, step = step.name(), "saga step started");
            journal.record(SagaEvent::step_started(index, step.name()));

            let step_input = completed.last().map_or(&input, |done| &done.value);
            let result = step.execute(ctx, step_input).await;

            match result {
                Ok(value) => {
                    journal.record(SagaEvent::step_completed(index, step.name()));
                    completed.push(Completed { index, step, value });
                }
                Err(error) => {
                    tracing::warn!(%saga_id, index, step = step.name(), %error, "saga step failed");
                    journal.record(SagaEvent::step_failed(index, step.name(), error.to_string()));
                    failure = Some((index, step.name(), error));
                    break;
                }
            }
        }

        let outcome = match failure {
            None => {
                journal.record(SagaEvent::saga_completed());
                metrics::counter!("saga_completed", "saga_type" => self.saga_type).increment(1);
                tracing::info!(%saga_id, "saga completed successfully");
                let value = completed.pop().map_or(input, |done| done.value);
                SagaOutcome::Succeeded(value)
            }
            Some((index, step, error)) => {
                let failure = self
                    .compensate(ctx, saga_id, &mut journal, completed, index, step, error)
                    .await;
                metrics::counter!("saga_failed", "saga_type" => self.saga_type).increment(1);
                tracing::warn!(
                    %saga_id,
                    step = failure.step,
                    compensated = failure.compensated.len(),
                    compensation_failures = failure.compensation_failures.len(),
                    "saga failed"
                );
                SagaOutcome::Failed(failure)
            }
        };

        let duration = started.elapsed();
        metrics::histogram!("saga_duration_seconds", "saga_type" => self.saga_type)
            .record(duration.as_secs_f64());

        SagaRun {
            saga_id,
            saga_type: self.saga_type,
            outcome,
            events: journal.events,
            instance: journal.instance,
            duration,
        }
    }

    /// Sweeps the completed steps in reverse, attempting each compensation
    /// exactly once.
    #[allow(clippy::too_many_arguments)]
    async fn compensate(
        &self,
        ctx: &C,
        saga_id: EntityId,
        journal: &mut Journal,
        completed: Vec<Completed<'_, C, V, E>>,
        index: usize,
        step: &'static str,
        error: E,
    ) -> SagaFailure<E> {
        journal.record(SagaEvent::compensation_started(step, completed.len()));

        let mut compensated = Vec::new();
        let mut compensation_failures = Vec::new();

        for done in completed.iter().rev() {
            let name = done.step.name();
            let Some(result) = done.step.compensate(ctx, &done.value).await else {
                journal.record(SagaEvent::compensation_step_skipped(done.index, name));
                continue;
            };

            match result {
                Ok(()) => {
                    let description = done.step.compensation_description();
                    tracing::info!(%saga_id, index = done.index, step = name, %description, "step compensated");
                    metrics::counter!("saga_compensations_total", "outcome" => "succeeded")
                        .increment(1);
                    journal.record(SagaEvent::compensation_step_completed(
                        done.index,
                        name,
                        description.clone(),
                    ));
                    compensated.push(CompensationRecord {
                        index: done.index,
                        step: name,
                        description,
                    });
                }
                Err(failure) => {
                    tracing::error!(%saga_id, index = done.index, step = name, error = %failure, "compensation failed");
                    metrics::counter!("saga_compensations_total", "outcome" => "failed")
                        .increment(1);
                    journal.record(SagaEvent::compensation_step_failed(
                        done.index,
                        name,
                        failure.to_string(),
                    ));
                    compensation_failures.push(CompensationFailure {
                        index: done.index,
                        step: name,
                        error: failure,
                    });
                }
            }
        }

        journal.record(SagaEvent::saga_failed(
            error.to_string(),
            compensation_failures.len(),
        ));

        SagaFailure {
            index,
            step,
            error,
            compensated,
            compensation_failures,
        }
    }
}

impl<C, V, E> fmt::Debug for Saga<C, V, E>
where
    C: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Saga")
            .field("saga_type", &self.saga_type)
            .field("steps", &self.steps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::state::SagaState;

    /// Records every action and compensation in call order.
    #[derive(Default)]
    struct Trace(Mutex<Vec<String>>);

    impl Trace {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    /// Adds `add` to its input, failing on demand.
    struct Scripted {
        name: &'static str,
        add: u32,
        fail: bool,
        undo: Option<bool>,
    }

    impl Scripted {
        fn ok(name: &'static str, add: u32) -> Self {
            Self {
                name,
                add,
                fail: false,
                undo: Some(true),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                fail: true,
                ..Self::ok(name, 0)
            }
        }

        fn without_compensation(mut self) -> Self {
            self.undo = None;
            self
        }

        fn with_failing_compensation(mut self) -> Self {
            self.undo = Some(false);
            self
        }
    }

    #[async_trait]
    impl SagaStep<Trace, u32, String> for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn execute(&self, ctx: &Trace, input: &u32) -> Result<u32, String> {
            ctx.push(format!("do {} <- {}", self.name, input));
            if self.fail {
                return Err(format!("{} error", self.name));
            }
            Ok(input + self.add)
        }

        async fn compensate(&self, ctx: &Trace, output: &u32) -> Option<Result<(), String>> {
            let succeeds = self.undo?;
            ctx.push(format!("undo {} @ {}", self.name, output));
            Some(if succeeds {
                Ok(())
            } else {
                Err(format!("{} undo error", self.name))
            })
        }

        fn compensation_description(&self) -> String {
            format!("{} undone", self.name)
        }
    }

    fn saga(steps: Vec<Scripted>) -> Saga<Trace, u32, String> {
        steps
            .into_iter()
            .fold(Saga::builder("Test"), |builder, step| builder.step(step))
            .build()
    }

    #[tokio::test]
    async fn test_all_steps_succeed_threading_values() {
        let trace = Trace::default();
        let saga = saga(vec![
            Scripted::ok("a", 1),
            Scripted::ok("b", 10),
            Scripted::ok("c", 100),
        ]);

        let run = saga.run(&trace, 0).await;

        assert_eq!(run.outcome, SagaOutcome::Succeeded(111));
        assert_eq!(trace.entries(), vec!["do a <- 0", "do b <- 1", "do c <- 11"]);
        assert_eq!(run.state(), SagaState::Succeeded);
        assert_eq!(run.completed_steps(), &["a", "b", "c"]);
        assert_eq!(run.events.first().map(SagaEvent::event_type), Some("SagaStarted"));
        assert_eq!(run.events.last().map(SagaEvent::event_type), Some("SagaCompleted"));
    }

    #[tokio::test]
    async fn test_zero_step_saga_succeeds_with_input() {
        let trace = Trace::default();
        let saga = saga(vec![]);
        assert!(saga.is_empty());

        let run = saga.run(&trace, 42).await;

        assert_eq!(run.outcome, SagaOutcome::Succeeded(42));
        assert!(trace.entries().is_empty());
        assert!(run.completed_steps().is_empty());
        let types: Vec<_> = run.events.iter().map(SagaEvent::event_type).collect();
        assert_eq!(types, vec!["SagaStarted", "SagaCompleted"]);
    }

    #[tokio::test]
    async fn test_first_failure_at_k_compensates_prior_steps_in_reverse() {
        for k in 0..4 {
            let trace = Trace::default();
            let steps = (0..4)
                .map(|i| {
                    let name = ["s0", "s1", "s2", "s3"][i];
                    if i == k {
                        Scripted::failing(name)
                    } else {
                        Scripted::ok(name, 1)
                    }
                })
                .collect();

            let run = saga(steps).run(&trace, 0).await;
            let failure = run.outcome.failure().unwrap();

            assert_eq!(failure.index, k);
            let undone: Vec<usize> = failure.compensated.iter().map(|c| c.index).collect();
            let expected: Vec<usize> = (0..k).rev().collect();
            assert_eq!(undone, expected, "failure at step {k}");

            let undo_calls = trace
                .entries()
                .iter()
                .filter(|entry| entry.starts_with("undo"))
                .count();
            assert_eq!(undo_calls, k);
            assert_eq!(run.state(), SagaState::Compensated);
        }
    }

    #[tokio::test]
    async fn test_failed_step_is_not_compensated_and_later_steps_never_run() {
        let trace = Trace::default();
        let saga = saga(vec![
            Scripted::ok("a", 1),
            Scripted::failing("b"),
            Scripted::ok("c", 1),
        ]);

        let run = saga.run(&trace, 5).await;

        assert_eq!(trace.entries(), vec!["do a <- 5", "do b <- 6", "undo a @ 6"]);
        let failure = run.outcome.failure().unwrap();
        assert_eq!(failure.step, "b");
        assert_eq!(failure.error, "b error");
        assert_eq!(failure.compensation_descriptions(), vec!["a undone"]);
        assert!(failure.is_clean());
    }

    #[tokio::test]
    async fn test_step_zero_failure_has_empty_sweep() {
        let trace = Trace::default();
        let run = saga(vec![Scripted::failing("a"), Scripted::ok("b", 1)])
            .run(&trace, 0)
            .await;

        let failure = run.outcome.failure().unwrap();
        assert_eq!(failure.index, 0);
        assert!(failure.compensated.is_empty());
        assert!(failure.is_clean());
        assert_eq!(trace.entries(), vec!["do a <- 0"]);
    }

    #[tokio::test]
    async fn test_compensation_failures_are_collected_and_sweep_continues() {
        let trace = Trace::default();
        let saga = saga(vec![
            Scripted::ok("a", 1),
            Scripted::ok("b", 1).with_failing_compensation(),
            Scripted::ok("c", 1).with_failing_compensation(),
            Scripted::failing("d"),
        ]);

        let run = saga.run(&trace, 0).await;
        let failure = run.outcome.failure().unwrap();

        assert_eq!(
            trace.entries()[4..],
            ["undo c @ 3", "undo b @ 2", "undo a @ 1"]
        );
        assert!(!failure.is_clean());
        let failed: Vec<&str> = failure.compensation_failures.iter().map(|f| f.step).collect();
        assert_eq!(failed, vec!["c", "b"]);
        assert_eq!(failure.compensation_descriptions(), vec!["a undone"]);
        assert_eq!(run.instance.failed_compensations(), &["c", "b"]);
        assert_eq!(run.instance.compensated_steps(), &["a"]);
    }

    #[tokio::test]
    async fn test_steps_without_compensation_are_skipped() {
        let trace = Trace::default();
        let saga = saga(vec![
            Scripted::ok("a", 1),
            Scripted::ok("b", 1).without_compensation(),
            Scripted::failing("c"),
        ]);

        let run = saga.run(&trace, 0).await;

        assert_eq!(trace.entries()[3..], ["undo a @ 1"]);
        assert!(run.events.iter().any(|event| matches!(
            event,
            SagaEvent::CompensationStepSkipped(data) if data.step_name == "b"
        )));
    }

    #[tokio::test]
    async fn test_journal_replays_to_run_instance() {
        let trace = Trace::default();
        let run = saga(vec![Scripted::ok("a", 1), Scripted::failing("b")])
            .run(&trace, 0)
            .await;

        assert_eq!(SagaInstance::replay(&run.events).unwrap(), run.instance);
        assert_eq!(run.instance.id(), Some(run.saga_id));
        assert_eq!(run.instance.failed_step(), Some("b"));
        assert_eq!(run.instance.failure_reason(), Some("b error"));
    }

    #[test]
    fn test_builder_preserves_declaration_order() {
        let saga = saga(vec![
            Scripted::ok("first", 0),
            Scripted::ok("second", 0),
            Scripted::ok("third", 0),
        ]);
        assert_eq!(saga.saga_type(), "Test");
        assert_eq!(saga.len(), 3);
        assert_eq!(saga.step_names(), vec!["first", "second", "third"]);
    }

    /// Overrides only `compensate`, leaving the description at its default.
    struct Reserve;

    #[async_trait]
    impl SagaStep<Trace, u32, String> for Reserve {
        fn name(&self) -> &'static str {
            "reserve"
        }

        async fn execute(&self, _ctx: &Trace, input: &u32) -> Result<u32, String> {
            Ok(*input)
        }

        async fn compensate(&self, ctx: &Trace, output: &u32) -> Option<Result<(), String>> {
            ctx.push(format!("release @ {output}"));
            Some(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_overriding_compensate_makes_a_step_compensable() {
        let trace = Trace::default();
        let saga: Saga<Trace, u32, String> = Saga::builder("Test")
            .step(Reserve)
            .step(Scripted::failing("b"))
            .build();

        let run = saga.run(&trace, 7).await;

        let failure = run.outcome.failure().unwrap();
        assert_eq!(failure.compensation_descriptions(), vec!["undo reserve"]);
        assert_eq!(trace.entries(), vec!["do b <- 7", "release @ 7"]);
        assert!(!run
            .events
            .iter()
            .any(|event| matches!(event, SagaEvent::CompensationStepSkipped(_))));
    }
}
