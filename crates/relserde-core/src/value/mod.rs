//! Runtime values of a persistent object graph.
//!
//! Entities are held behind `Arc` so the same instance can appear more than
//! once in a graph (and, through lazy references, cycle back to itself).


use crate::{
    model::entity::EntityModel,
    proxy::{LazyCollection, LazyRef, LoadError},
};
use std::sync::Arc;

/// Resolution target for a lazy reference that loaded no entity.
pub(crate) static NULL: Value = Value::Null;

///
/// Value
///

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    List(Vec<Self>),
    Entity(Arc<EntityValue>),
    /// Lazy single-valued reference.
    Proxy(Arc<LazyRef>),
    /// Lazy multi-valued relationship.
    Collection(Arc<LazyCollection>),
}

impl Value {
    /// Uninitialized reference backed by `loader`.
    pub fn lazy_ref(
        loader: impl Fn() -> Result<Option<Self>, LoadError> + Send + Sync + 'static,
    ) -> Self {
        Self::Proxy(Arc::new(LazyRef::new(loader)))
    }

    /// Uninitialized collection backed by `loader`.
    pub fn lazy_collection(
        loader: impl Fn() -> Result<Vec<Self>, LoadError> + Send + Sync + 'static,
    ) -> Self {
        Self::Collection(Arc::new(LazyCollection::new(loader)))
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Uint(_) => ValueKind::Uint,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::List(_) => ValueKind::List,
            Self::Entity(_) => ValueKind::Entity,
            Self::Proxy(_) => ValueKind::Proxy,
            Self::Collection(_) => ValueKind::Collection,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for deferred values that may still need loading.
    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        matches!(self, Self::Proxy(_) | Self::Collection(_))
    }

    /// True for multi-valued shapes, lazy or not.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Collection(_))
    }

    /// Emptiness as judged without loading anything: null, empty text,
    /// empty lists and initialized empty collections.
    #[must_use]
    pub fn is_empty_value(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Collection(collection) => collection.items().is_some_and(<[Self]>::is_empty),
            Self::Proxy(proxy) => matches!(proxy.get(), Some(None)),
            Self::Bool(_) | Self::Int(_) | Self::Uint(_) | Self::Float(_) | Self::Entity(_) => {
                false
            }
        }
    }

    #[must_use]
    pub fn as_entity(&self) -> Option<&EntityValue> {
        match self {
            Self::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Uint(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<EntityValue> for Value {
    fn from(entity: EntityValue) -> Self {
        Self::Entity(Arc::new(entity))
    }
}

impl From<Arc<EntityValue>> for Value {
    fn from(entity: Arc<EntityValue>) -> Self {
        Self::Entity(entity)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

///
/// ValueKind
/// Discriminant used for value-level serializer lookup.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    Text,
    List,
    Entity,
    Proxy,
    Collection,
}

impl ValueKind {
    #[must_use]
    pub const fn is_lazy(self) -> bool {
        matches!(self, Self::Proxy | Self::Collection)
    }
}

///
/// EntityValue
///
/// One entity instance: its model plus field values in insertion order.
/// Fields absent from the instance are skipped on output.
///

#[derive(Clone, Debug)]
pub struct EntityValue {
    model: &'static EntityModel,
    fields: Vec<(&'static str, Value)>,
}

impl EntityValue {
    #[must_use]
    pub const fn new(model: &'static EntityModel) -> Self {
        Self {
            model,
            fields: Vec::new(),
        }
    }

    /// Set a field, replacing any earlier value under the same name.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    #[must_use]
    pub const fn model(&self) -> &'static EntityModel {
        self.model
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.model.path
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::from(self)
    }
}
