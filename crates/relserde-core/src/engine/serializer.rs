use crate::{
    engine::{PropertyContext, Provider, SerializeError},
    module::Features,
    value::{Value, ValueKind},
};
use serde_json::Value as JsonValue;
use std::{fmt, sync::Arc};

///
/// ValueSerializer
///
/// Writes one runtime value as JSON. Serializers are resolved once per
/// property while an entity plan is built and may specialise themselves for
/// that property through `contextualize`.
///

pub trait ValueSerializer: fmt::Debug + Send + Sync {
    fn serialize(
        &self,
        value: &Value,
        provider: &mut Provider<'_>,
    ) -> Result<JsonValue, SerializeError>;

    /// True when the value counts as empty for `Include::NonEmpty`.
    fn is_empty(&self, value: &Value, _provider: &Provider<'_>) -> Result<bool, SerializeError> {
        Ok(value.is_empty_value())
    }

    /// Specialise for one property. `None` keeps this serializer as is.
    fn contextualize(
        &self,
        _property: &PropertyContext,
        _features: Features,
    ) -> Option<Arc<dyn ValueSerializer>> {
        None
    }
}

///
/// DefaultValueSerializer
///
/// The engine's own serializer. It knows nothing about persistence and
/// loads lazy values whenever it reaches them.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultValueSerializer;

impl ValueSerializer for DefaultValueSerializer {
    fn serialize(
        &self,
        value: &Value,
        provider: &mut Provider<'_>,
    ) -> Result<JsonValue, SerializeError> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::Bool(b) => Ok(JsonValue::Bool(*b)),
            Value::Int(i) => Ok(JsonValue::from(*i)),
            Value::Uint(u) => Ok(JsonValue::from(*u)),
            Value::Float(f) => Ok(JsonValue::from(*f)),
            Value::Text(text) => Ok(JsonValue::String(text.clone())),
            Value::List(items) => provider.serialize_items(items),
            Value::Entity(entity) => provider.serialize_entity(entity),
            Value::Proxy(proxy) => {
                let target = proxy
                    .initialize_and_return_object()
                    .map_err(|source| provider.load_error(source))?;
                match target {
                    Some(target) => provider.serialize_value(target),
                    None => Ok(JsonValue::Null),
                }
            }
            Value::Collection(collection) => {
                let items = collection
                    .initialize()
                    .map_err(|source| provider.load_error(source))?;
                provider.serialize_items(items)
            }
        }
    }
}

///
/// SerializerModifier
/// Property-level hook that may wrap the serializer chosen for a property.
///

pub trait SerializerModifier: fmt::Debug + Send + Sync {
    fn modify(
        &self,
        property: &PropertyContext,
        serializer: Arc<dyn ValueSerializer>,
    ) -> Arc<dyn ValueSerializer>;
}

///
/// Serializers
///
/// Value-level lookup, consulted for values reached outside a planned
/// property (the root value and elements of plain lists).
///

pub trait Serializers: fmt::Debug + Send + Sync {
    fn find_serializer(&self, kind: ValueKind) -> Option<Arc<dyn ValueSerializer>>;
}
