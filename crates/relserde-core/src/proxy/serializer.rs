use crate::{
    engine::{
        PropertyContext, PropertyRef, Provider, SerializeError, SerializerModifier, Serializers,
        ValueSerializer,
    },
    module::Features,
    proxy::{LoadError, ProxyPolicy, Resolution},
    value::{Value, ValueKind},
};
use serde_json::Value as JsonValue;
use std::sync::Arc;

///
/// ProxySerializer
///
/// Wraps the serializer the engine chose for a relationship property and
/// runs values through the proxy policy first. Suppressed values are
/// written as null; resolved values go to the wrapped serializer.
///

#[derive(Clone, Debug)]
pub struct ProxySerializer {
    delegate: Option<Arc<dyn ValueSerializer>>,
    policy: ProxyPolicy,
    property: Option<PropertyRef>,
}

impl ProxySerializer {
    #[must_use]
    pub const fn new(delegate: Option<Arc<dyn ValueSerializer>>, policy: ProxyPolicy) -> Self {
        Self {
            delegate,
            policy,
            property: None,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &ProxyPolicy {
        &self.policy
    }

    /// Property this serializer was specialised for.
    #[must_use]
    pub const fn property(&self) -> Option<PropertyRef> {
        self.property
    }

    fn property_or_current(&self, provider: &Provider<'_>) -> PropertyRef {
        self.property
            .unwrap_or_else(|| provider.current_property())
    }

    fn unwrap_error(&self, provider: &Provider<'_>, source: LoadError) -> SerializeError {
        let mut err = provider.load_error(source);
        if let SerializeError::ProxyUnwrap { property, .. } = &mut err {
            *property = self.property_or_current(provider);
        }

        err
    }
}

impl ValueSerializer for ProxySerializer {
    fn serialize(
        &self,
        value: &Value,
        provider: &mut Provider<'_>,
    ) -> Result<JsonValue, SerializeError> {
        let resolved = self
            .policy
            .resolve_with(value, provider.features())
            .map_err(|source| self.unwrap_error(provider, source))?;

        match resolved {
            Resolution::Suppress | Resolution::Value(Value::Null) => Ok(provider.serialize_null()),
            Resolution::Value(resolved) => {
                let Some(delegate) = &self.delegate else {
                    return Err(SerializeError::MissingSerializer {
                        property: self.property_or_current(provider),
                    });
                };

                delegate.serialize(resolved, provider)
            }
        }
    }

    fn is_empty(&self, value: &Value, provider: &Provider<'_>) -> Result<bool, SerializeError> {
        self.policy
            .is_empty_with(value, provider.features())
            .map_err(|source| self.unwrap_error(provider, source))
    }

    fn contextualize(
        &self,
        property: &PropertyContext,
        features: Features,
    ) -> Option<Arc<dyn ValueSerializer>> {
        let delegate = self.delegate.as_ref().map(|delegate| {
            delegate
                .contextualize(property, features)
                .unwrap_or_else(|| Arc::clone(delegate))
        });

        // eager collections bypass the policy entirely
        if property.field.kind.is_collection()
            && !self.policy.uses_lazy_loading(Some(property.field), features)
            && let Some(delegate) = &delegate
        {
            log::trace!("{} is eager", property.property_ref());
            return Some(Arc::clone(delegate));
        }

        Some(Arc::new(Self {
            delegate,
            policy: self.policy.clone(),
            property: Some(property.property_ref()),
        }))
    }
}

///
/// ProxySerializerModifier
/// Wraps the serializer of every relationship and collection property.
///

#[derive(Clone, Debug)]
pub struct ProxySerializerModifier {
    policy: ProxyPolicy,
}

impl ProxySerializerModifier {
    #[must_use]
    pub const fn new(policy: ProxyPolicy) -> Self {
        Self { policy }
    }
}

impl SerializerModifier for ProxySerializerModifier {
    fn modify(
        &self,
        property: &PropertyContext,
        serializer: Arc<dyn ValueSerializer>,
    ) -> Arc<dyn ValueSerializer> {
        if property.field.is_reference() || property.field.kind.is_collection() {
            Arc::new(ProxySerializer::new(Some(serializer), self.policy.clone()))
        } else {
            serializer
        }
    }
}

///
/// ProxySerializers
///
/// Value-level serializers for lazy values met outside a planned property,
/// such as the root value or the elements of a plain list.
///

#[derive(Debug)]
pub struct ProxySerializers {
    serializer: Arc<dyn ValueSerializer>,
}

impl ProxySerializers {
    #[must_use]
    pub fn new(delegate: Option<Arc<dyn ValueSerializer>>, policy: ProxyPolicy) -> Self {
        Self {
            serializer: Arc::new(ProxySerializer::new(delegate, policy)),
        }
    }
}

impl Serializers for ProxySerializers {
    fn find_serializer(&self, kind: ValueKind) -> Option<Arc<dyn ValueSerializer>> {
        kind.is_lazy().then(|| Arc::clone(&self.serializer))
    }
}
