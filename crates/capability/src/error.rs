//! Capability resolution errors.

use thiserror::Error;

/// Errors raised while building or querying a capability scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// No binding for the capability exists anywhere in the scope chain.
    #[error("Unresolved capability: {capability}")]
    Unresolved { capability: &'static str },

    /// A bundle tried to bind the same capability type twice.
    #[error("Duplicate capability {capability} in bundle '{bundle}'")]
    Duplicate {
        capability: &'static str,
        bundle: &'static str,
    },
}

/// Convenience type alias for capability results.
pub type Result<T> = std::result::Result<T, CapabilityError>;
