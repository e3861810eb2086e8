//! Wiring for the fulfillment demo binary.
//!
//! Everything a process boundary needs lives here so it can be tested
//! without running `main`: configuration, the root capability scope and
//! facades, and a serialisable summary of a saga run.

pub mod config;
pub mod error;
pub mod report;
pub mod wiring;

pub use config::{Config, FailurePoint, LogFormat};
pub use error::AppError;
pub use report::RunSummary;
pub use wiring::{Application, Wiring, demo_request};
