//! Binary error types.

use thiserror::Error;

/// Errors that stop the demo binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable held an unusable value.
    #[error("Invalid value {value:?} for {key}: expected one of {expected}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    /// The Prometheus recorder could not be installed.
    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// The run summary could not be rendered.
    #[error("Failed to render run summary: {0}")]
    Serialization(#[from] serde_json::Error),
}
