//! Event publishing and logging capabilities.

use std::sync::{Arc, RwLock};

use super::{read, write};
use crate::capabilities::{DomainEvent, EventPublisher, Logger};

/// Event publisher keeping every published event in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    published: Arc<RwLock<Vec<(String, DomainEvent)>>>,
}

impl InMemoryEventPublisher {
    /// Creates a new in-memory publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the names of all published events, in publication order.
    pub fn event_names(&self) -> Vec<String> {
        read(&self.published)
            .iter()
            .map(|(_, event)| event.name.clone())
            .collect()
    }

    /// Returns the events published on `topic`.
    pub fn events_on(&self, topic: &str) -> Vec<DomainEvent> {
        read(&self.published)
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

impl EventPublisher for InMemoryEventPublisher {
    fn publish(&self, topic: &str, event: DomainEvent) {
        tracing::debug!(topic, event = %event.name, "event published");
        write(&self.published).push((topic.to_string(), event));
    }
}

/// Logger forwarding business log lines to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, context: &str, message: &str) {
        tracing::info!(target: "business", context, "{message}");
    }
}

/// Logger keeping every line in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    lines: Arc<RwLock<Vec<String>>>,
}

impl RecordingLogger {
    /// Creates a new recording logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every logged line formatted as `context: message`.
    pub fn lines(&self) -> Vec<String> {
        read(&self.lines).clone()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, context: &str, message: &str) {
        write(&self.lines).push(format!("{context}: {message}"));
    }
}
