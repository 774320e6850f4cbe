//! Lazy references and collections, and the policy that decides whether
//! serialization may load them.

mod deferred;
mod policy;
mod serializer;


use crate::value::Value;
use derive_more::Deref;
use std::{error::Error, fmt};
use thiserror::Error as ThisError;

pub use deferred::Deferred;
pub use policy::{ProxyPolicy, Resolution};
pub use serializer::{ProxySerializer, ProxySerializerModifier, ProxySerializers};

///
/// LoadError
/// Failure reported by a lazy loader.
///

#[derive(Debug, ThisError)]
#[error(transparent)]
pub struct LoadError(Box<dyn Error + Send + Sync>);

impl LoadError {
    pub fn new(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self(err.into())
    }

    pub fn msg(message: impl fmt::Display) -> Self {
        Self(message.to_string().into())
    }
}

///
/// LazyRef
///
/// Deferred single-valued reference. Loading may yield no entity, in which
/// case the reference resolves to null.
///

#[derive(Debug, Deref)]
pub struct LazyRef(Deferred<Option<Value>>);

impl LazyRef {
    pub fn new(
        loader: impl Fn() -> Result<Option<Value>, LoadError> + Send + Sync + 'static,
    ) -> Self {
        Self(Deferred::new(loader))
    }

    /// Already-initialized reference.
    #[must_use]
    pub fn loaded(target: Option<Value>) -> Self {
        Self(Deferred::loaded(target))
    }

    /// Force initialization and return the real object, if any.
    pub fn initialize_and_return_object(&self) -> Result<Option<&Value>, LoadError> {
        self.0.initialize().map(Option::as_ref)
    }

    /// Install the target of an uninitialized reference without running the
    /// loader. Returns false when the reference was already initialized.
    pub fn resolve_to(&self, target: Option<Value>) -> bool {
        self.0.fill(target)
    }
}

///
/// LazyCollection
/// Deferred multi-valued relationship.
///

#[derive(Debug, Deref)]
pub struct LazyCollection(Deferred<Vec<Value>>);

impl LazyCollection {
    pub fn new(loader: impl Fn() -> Result<Vec<Value>, LoadError> + Send + Sync + 'static) -> Self {
        Self(Deferred::new(loader))
    }

    #[must_use]
    pub fn loaded(items: Vec<Value>) -> Self {
        Self(Deferred::loaded(items))
    }

    /// Load the collection if needed and return its elements.
    pub fn initialize(&self) -> Result<&[Value], LoadError> {
        self.0.initialize().map(Vec::as_slice)
    }

    /// Elements of an initialized collection.
    #[must_use]
    pub fn items(&self) -> Option<&[Value]> {
        self.0.get().map(Vec::as_slice)
    }

    /// Install the elements of an uninitialized collection without running
    /// the loader. Returns false when the collection was already initialized.
    pub fn resolve_to(&self, items: Vec<Value>) -> bool {
        self.0.fill(items)
    }
}
