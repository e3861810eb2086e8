//! Pure operations executed under a capability scope.

use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::scope::{Requirements, Scope};

/// A business operation that declares the capabilities it needs.
///
/// Use cases are command-like structs carrying their input. They are run
/// through [`Scope::execute`], which hands [`UseCase::run`] a scope holding
/// only the capabilities listed by [`UseCase::requires`]. Resolving anything
/// else inside `run` fails with [`CapabilityError::Unresolved`].
#[async_trait]
pub trait UseCase: Send + Sized {
    /// Value produced on success.
    type Output: Send;

    /// Domain error type. Must absorb capability resolution failures.
    type Error: From<CapabilityError> + Send;

    /// Operation name used in logs.
    const NAME: &'static str;

    /// The minimal set of capabilities this operation resolves.
    fn requires() -> Requirements;

    /// Runs the operation against a scope restricted to [`UseCase::requires`].
    async fn run(self, scope: &Scope) -> Result<Self::Output, Self::Error>;
}

impl Scope {
    /// Runs `use_case` under this scope.
    ///
    /// Every declared requirement is checked before the operation starts, so
    /// a missing capability surfaces as an error without side effects.
    pub async fn execute<U>(&self, use_case: U) -> Result<U::Output, U::Error>
    where
        U: UseCase,
    {
        let restricted = self.restrict(&U::requires()).inspect_err(|err| {
            tracing::warn!(use_case = U::NAME, error = %err, "use case requirements not met");
        })?;
        use_case.run(&restricted).await
    }
}
