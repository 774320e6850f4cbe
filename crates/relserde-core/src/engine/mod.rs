//! Generic serialization engine.
//!
//! The engine walks a value graph and writes JSON. It knows nothing about
//! persistence: relationship roles, property filtering and lazy-value
//! handling all arrive through the hooks a module registers
//! (introspectors, serializer modifiers and value-level serializers).

mod context;
mod introspect;
mod mapper;
mod plan;
mod provider;
mod serializer;


use crate::{
    error::{ErrorClass, ErrorOrigin},
    proxy::LoadError,
};
use thiserror::Error as ThisError;

pub use context::{PropertyContext, PropertyRef};
pub use introspect::Introspector;
pub use mapper::{DEFAULT_MAX_DEPTH, Include, Mapper, Module, SetupContext};
pub use plan::{EntityPlan, PropertyPlan};
pub use provider::Provider;
pub use serializer::{DefaultValueSerializer, SerializerModifier, Serializers, ValueSerializer};

///
/// SerializeError
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("maximum nesting depth {limit} exceeded at entity '{entity}'")]
    DepthLimit { limit: usize, entity: &'static str },

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no value serializer available for {property}")]
    MissingSerializer { property: PropertyRef },

    #[error("failed to load lazy value at {property}: {source}")]
    ProxyUnwrap {
        property: PropertyRef,
        source: LoadError,
    },
}

impl SerializeError {
    pub(crate) const fn classify(&self) -> (ErrorClass, ErrorOrigin) {
        match self {
            Self::DepthLimit { .. } => (ErrorClass::Unsupported, ErrorOrigin::Serialize),
            Self::Json(_) => (ErrorClass::InvariantViolation, ErrorOrigin::Serialize),
            Self::MissingSerializer { .. } => (ErrorClass::Configuration, ErrorOrigin::Serialize),
            Self::ProxyUnwrap { .. } => (ErrorClass::Load, ErrorOrigin::Proxy),
        }
    }

    /// Property the error was raised at, when known.
    #[must_use]
    pub const fn property(&self) -> Option<PropertyRef> {
        match self {
            Self::MissingSerializer { property } | Self::ProxyUnwrap { property, .. } => {
                Some(*property)
            }
            Self::DepthLimit { .. } | Self::Json(_) => None,
        }
    }
}
