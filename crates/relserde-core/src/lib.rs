//! Core runtime for relserde: entity models, the metadata catalog,
//! relationship inference, lazy-value policy, the serialization engine and
//! the persistence module that ties them together.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod module;
pub mod obs;
pub mod proxy;
pub mod relation;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, engine hooks or metrics are re-exported here.
///

pub mod prelude {
    pub use crate::{
        catalog::Catalog,
        model::{
            entity::{EntityKind, EntityModel},
            field::{Cardinality, EntityFieldKind, EntityFieldModel},
        },
        module::{EntityMapper, Feature, Features, PersistenceModule},
        relation::ReferenceDirection,
        value::{EntityValue, Value},
    };
}
