//! Capabilities shared by every bounded domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fact published by a domain after a successful state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Event name, e.g. `"OrderPlaced"`.
    pub name: String,
    /// Event payload.
    pub payload: serde_json::Value,
    /// When the event was raised.
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    /// Creates an event stamped with the current time.
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
            occurred_at: Utc::now(),
        }
    }
}

/// Publishes domain events to a topic.
pub trait EventPublisher: Send + Sync {
    /// Publishes `event` on `topic`.
    fn publish(&self, topic: &str, event: DomainEvent);
}

/// Business-level logging, distinct from process diagnostics.
pub trait Logger: Send + Sync {
    /// Records `message` under `context` (usually the use case name).
    fn log(&self, context: &str, message: &str);
}
