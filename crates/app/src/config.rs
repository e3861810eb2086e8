//! Application configuration loaded from environment variables.

use crate::error::AppError;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(AppError::InvalidConfig {
                key: "LOG_FORMAT",
                value: value.to_string(),
                expected: "pretty, json",
            }),
        }
    }
}

/// Where the demo run injects a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    /// The order store rejects the new order.
    CreateOrder,
    /// The payment gateway declines the charge.
    ProcessPayment,
    /// The carrier rejects the booking.
    CreateShipment,
    /// The carrier rejects the booking and the refund fails too.
    Refund,
}

impl FailurePoint {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "create_order" => Ok(FailurePoint::CreateOrder),
            "process_payment" => Ok(FailurePoint::ProcessPayment),
            "create_shipment" => Ok(FailurePoint::CreateShipment),
            "refund" => Ok(FailurePoint::Refund),
            _ => Err(AppError::InvalidConfig {
                key: "FAIL_AT",
                value: value.to_string(),
                expected: "create_order, process_payment, create_shipment, refund",
            }),
        }
    }
}

/// Demo configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
/// - `FAIL_AT`: step to break for the demo run (default: none)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub fail_at: Option<FailurePoint>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: get("LOG_FORMAT")
                .map(|value| LogFormat::parse(&value))
                .transpose()?
                .unwrap_or(defaults.log_format),
            fail_at: get("FAIL_AT")
                .map(|value| FailurePoint::parse(&value))
                .transpose()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            fail_at: None,
        }
    }
}
