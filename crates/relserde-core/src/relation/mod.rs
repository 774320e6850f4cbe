//! Bidirectional relationship inference.
//!
//! For every property the engine asks which role it plays in a
//! bidirectional relationship:
//! - the managed side owns the relationship and names the inverse field
//!   through `mapped_by`
//! - the back side is the single-valued field that some managed side names
//!
//! Writing the managed side suppresses the matching back side, which is how
//! parent/child cycles are broken. Lookups that miss (unknown entity, no
//! matching declaration) classify as `None` and never fail.

#[cfg(test)]
mod tests;

use crate::{
    catalog::Catalog,
    engine::{Introspector, PropertyContext},
    model::field::EntityFieldModel,
    module::Features,
};
use serde::Serialize;
use std::sync::Arc;

///
/// ReferenceDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum ReferenceDirection {
    #[default]
    None,
    /// Owning side; `inverse` is the field on the related entity that
    /// points back.
    Managed { inverse: &'static str },
    /// Inverse side; `owner` is the managed field on the related entity.
    Back { owner: &'static str },
}

impl ReferenceDirection {
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub const fn is_managed(&self) -> bool {
        matches!(self, Self::Managed { .. })
    }

    #[must_use]
    pub const fn is_back(&self) -> bool {
        matches!(self, Self::Back { .. })
    }

    /// Name carried by the direction: the inverse field for managed, the
    /// owning field for back.
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Managed { inverse } => Some(*inverse),
            Self::Back { owner } => Some(*owner),
        }
    }
}

///
/// DirectionResolver
///
/// Classifies a field of an entity against the catalog. Managed is tried
/// first; a field is only ever one of managed or back.
///

#[derive(Clone, Debug)]
pub struct DirectionResolver {
    catalog: Arc<Catalog>,
}

impl DirectionResolver {
    #[must_use]
    pub const fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Classify `field` as seen on entity `owner` (normally the declaring
    /// entity of the field).
    #[must_use]
    pub fn classify(&self, owner: &str, field: &str) -> ReferenceDirection {
        if let Some(inverse) = self.managed_inverse(owner, field) {
            return ReferenceDirection::Managed { inverse };
        }
        if let Some(owner) = self.back_owner(owner, field) {
            return ReferenceDirection::Back { owner };
        }

        ReferenceDirection::None
    }

    /// Inverse name declared for `field`, searching the concrete subclasses
    /// when `owner` is abstract. First match in registration order wins.
    #[must_use]
    pub fn managed_inverse(&self, owner: &str, field: &str) -> Option<&'static str> {
        self.catalog
            .relation_candidates(owner)
            .iter()
            .filter_map(|candidate| self.catalog.field(candidate.path, field))
            .find_map(EntityFieldModel::inverse)
    }

    /// Name of the managed field that claims `field` as its inverse.
    #[must_use]
    pub fn back_owner(&self, owner: &str, field: &str) -> Option<&'static str> {
        let entity = self.catalog.entity(owner)?;
        let described = self.catalog.field(entity.path, field)?;

        if !described.is_reference() || !described.is_not_array_or_collection() {
            return None;
        }
        if !self.catalog.is_referenced(entity.path, field) {
            return None;
        }

        let related = described.kind.real_type()?;
        self.catalog
            .relation_candidates(related)
            .iter()
            .find_map(|candidate| {
                self.catalog
                    .field_with_mapped_by(candidate, entity.path, field)
            })
            .map(|owning| owning.name)
    }
}

///
/// RelationIntrospector
///
/// Introspector contributed by the persistence module. Direction comes from
/// the resolver; transient fields are ignored while the transient marker
/// feature is on.
///

#[derive(Clone, Debug)]
pub struct RelationIntrospector {
    resolver: DirectionResolver,
}

impl RelationIntrospector {
    #[must_use]
    pub const fn new(resolver: DirectionResolver) -> Self {
        Self { resolver }
    }
}

impl Introspector for RelationIntrospector {
    fn reference_direction(&self, property: &PropertyContext) -> ReferenceDirection {
        let direction = self
            .resolver
            .classify(property.declaring.path, property.field.name);

        if !direction.is_none() {
            log::trace!("{} is {direction:?}", property.property_ref());
        }

        direction
    }

    fn is_ignored(&self, property: &PropertyContext, features: Features) -> bool {
        features.use_transient_marker() && property.field.transient
    }
}
