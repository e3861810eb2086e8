//! Domain facades.

use std::sync::Arc;

use crate::bundle::Bundle;
use crate::error::Result;
use crate::scope::Scope;
use crate::use_case::UseCase;

/// The public entry point of one bounded domain.
///
/// A facade owns exactly one bundle and the root scope it was wired under.
/// It keeps no other state: every call builds a fresh scope from the root and
/// the bundle, runs one use case in it and returns the result unchanged.
/// Concurrent calls therefore never share a scope.
pub struct Facade<B: Bundle> {
    root: Scope,
    bundle: Arc<B>,
}

impl<B: Bundle> Facade<B> {
    /// Creates a facade under an empty root scope.
    pub fn new(bundle: B) -> Self {
        Self::with_root(Scope::root(), bundle)
    }

    /// Creates a facade whose call scopes are children of `root`.
    pub fn with_root(root: Scope, bundle: B) -> Self {
        tracing::debug!(bundle = bundle.name(), "facade wired");
        Self {
            root,
            bundle: Arc::new(bundle),
        }
    }

    /// Returns the bundle this facade wraps.
    pub fn bundle(&self) -> &B {
        &self.bundle
    }

    /// Returns a fresh call scope with the bundle installed.
    pub fn scope(&self) -> Result<Scope> {
        self.root.with_bundle(self.bundle.as_ref())
    }

    /// Runs a single use case under a fresh call scope.
    pub async fn execute<U>(&self, use_case: U) -> std::result::Result<U::Output, U::Error>
    where
        U: UseCase,
    {
        tracing::debug!(
            bundle = self.bundle.name(),
            use_case = U::NAME,
            "executing use case"
        );
        let scope = self.scope()?;
        scope.execute(use_case).await
    }
}

impl<B: Bundle> std::fmt::Debug for Facade<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facade")
            .field("bundle", &self.bundle.name())
            .finish()
    }
}
