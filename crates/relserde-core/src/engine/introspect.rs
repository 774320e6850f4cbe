use crate::{engine::PropertyContext, module::Features, relation::ReferenceDirection};
use std::{fmt, sync::Arc};

///
/// Introspector
///
/// Metadata hook consulted while building an entity plan. Introspectors are
/// chained in registration order; an earlier one that gives an answer wins.
///

pub trait Introspector: fmt::Debug + Send + Sync {
    /// Role of the property in a bidirectional relationship.
    fn reference_direction(&self, _property: &PropertyContext) -> ReferenceDirection {
        ReferenceDirection::None
    }

    /// True when the property must be left out of the output.
    fn is_ignored(&self, _property: &PropertyContext, _features: Features) -> bool {
        false
    }
}

///
/// IntrospectorChain
///

#[derive(Clone, Debug, Default)]
pub(crate) struct IntrospectorChain(Vec<Arc<dyn Introspector>>);

impl IntrospectorChain {
    pub(crate) fn append(&mut self, introspector: Arc<dyn Introspector>) {
        self.0.push(introspector);
    }

    pub(crate) fn reference_direction(&self, property: &PropertyContext) -> ReferenceDirection {
        self.0
            .iter()
            .map(|introspector| introspector.reference_direction(property))
            .find(|direction| !direction.is_none())
            .unwrap_or_default()
    }

    pub(crate) fn is_ignored(&self, property: &PropertyContext, features: Features) -> bool {
        self.0
            .iter()
            .any(|introspector| introspector.is_ignored(property, features))
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}
