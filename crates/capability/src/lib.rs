//! Capability-scoped dependency resolution.
//!
//! A [`Scope`] maps capability types (usually `dyn Trait`) to instances.
//! Scopes nest: a child frame shadows bindings of its parent without ever
//! mutating it. A [`Bundle`] groups the capabilities of one bounded domain,
//! a [`Facade`] installs its bundle into a fresh scope on every call, and a
//! [`UseCase`] declares exactly which capabilities it may resolve.

pub mod bundle;
pub mod error;
pub mod facade;
pub mod scope;
pub mod use_case;

pub use bundle::{Bindings, Bundle};
pub use error::CapabilityError;
pub use facade::Facade;
pub use scope::{Requirement, Requirements, Scope};
pub use use_case::UseCase;
