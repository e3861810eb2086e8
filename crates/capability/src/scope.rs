//! Nested capability scopes.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use crate::bundle::{Bindings, Bundle};
use crate::error::{CapabilityError, Result};

/// A single capability binding.
///
/// The instance is an `Arc<T>` erased behind `Any`, so that unsized
/// capability types (`dyn Trait`) can be stored and cloned without knowing
/// `T` at the frame level.
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) name: &'static str,
    pub(crate) instance: Arc<dyn Any + Send + Sync>,
}

impl Binding {
    pub(crate) fn new<T>(instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            name: type_name::<T>(),
            instance: Arc::new(instance),
        }
    }

    fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.instance.downcast_ref::<Arc<T>>().cloned()
    }
}

/// One immutable layer of a scope chain.
struct Frame {
    bindings: HashMap<TypeId, Binding>,
    parent: Option<Arc<Frame>>,
}

/// A lookup context resolving capabilities by type.
///
/// Scopes are persistent: [`Scope::with`] returns a new child scope and
/// leaves the receiver untouched. Lookup walks from the innermost frame
/// outwards, so inner bindings shadow outer ones. Cloning a scope is cheap
/// and yields a handle to the same chain.
#[derive(Clone)]
pub struct Scope {
    frame: Arc<Frame>,
}

impl Scope {
    /// Creates an empty root scope.
    pub fn root() -> Self {
        Self {
            frame: Arc::new(Frame {
                bindings: HashMap::new(),
                parent: None,
            }),
        }
    }

    /// Resolves the innermost binding for capability `T`.
    ///
    /// Returns [`CapabilityError::Unresolved`] if no frame in the chain binds
    /// `T`. There is no fallback to a default instance.
    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.lookup(TypeId::of::<T>())
            .and_then(Binding::downcast::<T>)
            .ok_or(CapabilityError::Unresolved {
                capability: type_name::<T>(),
            })
    }

    /// Returns true if `T` is bound somewhere in the chain.
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.lookup(TypeId::of::<T>()).is_some()
    }

    /// Returns a child scope in which `T` maps to `instance`.
    pub fn with<T>(&self, instance: Arc<T>) -> Scope
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let mut bindings = HashMap::with_capacity(1);
        bindings.insert(TypeId::of::<T>(), Binding::new(instance));
        self.child(bindings)
    }

    /// Runs `body` under a child scope binding `T` to `instance`.
    ///
    /// The child scope is dropped when `body` returns; the receiver is
    /// unaffected.
    pub fn within<T, R>(&self, instance: Arc<T>, body: impl FnOnce(&Scope) -> R) -> R
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let child = self.with(instance);
        body(&child)
    }

    /// Returns a child scope with every capability of `bundle` bound in a
    /// single frame.
    pub fn with_bundle<B>(&self, bundle: &B) -> Result<Scope>
    where
        B: Bundle + ?Sized,
    {
        let mut bindings = Bindings::new(bundle.name());
        bundle.bind(&mut bindings)?;
        tracing::trace!(
            bundle = bundle.name(),
            capabilities = bindings.len(),
            "bundle installed"
        );
        Ok(self.child(bindings.into_entries()))
    }

    /// Builds a fresh root scope containing only the required capabilities.
    ///
    /// Each requirement is resolved through the full chain, so shadowing is
    /// honoured. Fails on the first requirement that is not bound.
    pub fn restrict(&self, requirements: &Requirements) -> Result<Scope> {
        let mut bindings = HashMap::with_capacity(requirements.len());
        for requirement in requirements.iter() {
            let binding = self
                .lookup(requirement.type_id)
                .ok_or(CapabilityError::Unresolved {
                    capability: requirement.name,
                })?;
            bindings.insert(requirement.type_id, binding.clone());
        }
        Ok(Scope {
            frame: Arc::new(Frame {
                bindings,
                parent: None,
            }),
        })
    }

    /// Returns the number of frames in the chain, root included.
    pub fn depth(&self) -> usize {
        self.frames().count()
    }

    /// Returns the type names visible from this scope, innermost first.
    ///
    /// Shadowed bindings are listed once.
    pub fn capability_names(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        let mut names = Vec::new();
        for frame in self.frames() {
            for (type_id, binding) in &frame.bindings {
                if !seen.contains(type_id) {
                    seen.push(*type_id);
                    names.push(binding.name);
                }
            }
        }
        names
    }

    fn child(&self, bindings: HashMap<TypeId, Binding>) -> Scope {
        Scope {
            frame: Arc::new(Frame {
                bindings,
                parent: Some(Arc::clone(&self.frame)),
            }),
        }
    }

    fn lookup(&self, type_id: TypeId) -> Option<&Binding> {
        self.frames().find_map(|frame| frame.bindings.get(&type_id))
    }

    fn frames(&self) -> impl Iterator<Item = &Frame> {
        std::iter::successors(Some(self.frame.as_ref()), |frame| frame.parent.as_deref())
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("depth", &self.depth())
            .field("capabilities", &self.capability_names())
            .finish()
    }
}

/// A capability type a use case declares it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    type_id: TypeId,
    name: &'static str,
}

impl Requirement {
    /// Creates the requirement for capability `T`.
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the capability's type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The set of capabilities a use case may resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements(Vec<Requirement>);

impl Requirements {
    /// Creates an empty requirement set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds capability `T` to the set. Adding the same type twice is a no-op.
    pub fn require<T>(mut self) -> Self
    where
        T: ?Sized + 'static,
    {
        let requirement = Requirement::of::<T>();
        if !self.0.contains(&requirement) {
            self.0.push(requirement);
        }
        self
    }

    /// Iterates over the declared requirements in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.0.iter()
    }

    /// Returns the number of declared requirements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is required.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
