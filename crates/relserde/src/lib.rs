//! relserde: relationship-aware JSON serialization for persistent entity
//! graphs with lazy references and bidirectional relationships.
//!
//! ## Crate layout
//! - `core`: entity models, catalog, relationship inference, proxy policy,
//!   the serialization engine and the persistence module.
//! - `error`: the public error type.
//!
//! The `prelude` module carries the vocabulary needed to declare entities,
//! build a catalog and write values.

pub use relserde_core as core;

pub mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

use crate::core::{module::EntityMapper, value::Value};
use serde_json::Value as JsonValue;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Write `value` as a JSON tree.
pub fn to_json(mapper: &EntityMapper, value: &Value) -> Result<JsonValue, Error> {
    mapper.write_value(value).map_err(Error::from)
}

/// Write `value` as JSON text, compact or pretty per the mapper settings.
pub fn to_string(mapper: &EntityMapper, value: &Value) -> Result<String, Error> {
    mapper.write_string(value).map_err(Error::from)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        catalog::Catalog,
        config::{FeatureConfig, SerializerConfig},
        engine::Include,
        model::{
            entity::{EntityKind, EntityModel},
            field::{Cardinality, EntityFieldKind, EntityFieldModel},
        },
        module::{EntityMapper, Feature, Features, PersistenceModule},
        proxy::{LazyCollection, LazyRef, LoadError},
        relation::ReferenceDirection,
        value::{EntityValue, Value},
    };
    pub use crate::{Error, to_json, to_string};
}
