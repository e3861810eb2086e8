//! Capability bundles.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CapabilityError, Result};
use crate::scope::Binding;

/// An immutable grouping of the capabilities of one bounded domain.
///
/// Implementations are plain structs of `Arc<dyn Capability>` fields built
/// once at wiring time. [`Bundle::bind`] lists every field into a
/// [`Bindings`] set; each capability type may appear only once.
pub trait Bundle: Send + Sync + 'static {
    /// Returns the bounded domain this bundle belongs to.
    fn name(&self) -> &'static str;

    /// Adds every capability of this bundle to `bindings`.
    fn bind(&self, bindings: &mut Bindings) -> Result<()>;
}

/// The set of capability bindings produced by a [`Bundle`].
pub struct Bindings {
    bundle: &'static str,
    entries: HashMap<TypeId, Binding>,
}

impl Bindings {
    pub(crate) fn new(bundle: &'static str) -> Self {
        Self {
            bundle,
            entries: HashMap::new(),
        }
    }

    /// Binds capability `T` to `instance`.
    ///
    /// Fails with [`CapabilityError::Duplicate`] if `T` is already bound in
    /// this set.
    pub fn insert<T>(&mut self, instance: Arc<T>) -> Result<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<T>();
        if self.entries.contains_key(&type_id) {
            return Err(CapabilityError::Duplicate {
                capability: type_name::<T>(),
                bundle: self.bundle,
            });
        }
        self.entries.insert(type_id, Binding::new(instance));
        Ok(self)
    }

    /// Returns the number of bound capabilities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> HashMap<TypeId, Binding> {
        self.entries
    }
}
