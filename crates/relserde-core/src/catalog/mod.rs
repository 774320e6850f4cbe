//! Entity metadata catalog.
//!
//! The catalog is built once from the registered entity models and is
//! read-only afterwards. Every lookup that relationship inference needs
//! (inherited fields, concrete subclasses of abstract entities, inverse
//! references) is precomputed here so classification never scans.

mod builder;


use crate::model::{entity::EntityModel, field::EntityFieldModel};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

pub use builder::CatalogBuilder;

///
/// CatalogError
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("entity '{path}' registered more than once")]
    DuplicateEntity { path: &'static str },

    #[error("inheritance cycle detected at entity '{path}'")]
    InheritanceCycle { path: &'static str },

    #[error("entity '{path}' extends unregistered entity '{super_path}'")]
    UnknownSuper {
        path: &'static str,
        super_path: &'static str,
    },
}

///
/// ResolvedField
/// A field visible on an entity, paired with the entity that declares it.
///

#[derive(Clone, Copy, Debug)]
pub struct ResolvedField {
    pub declaring: &'static EntityModel,
    pub field: &'static EntityFieldModel,
}

///
/// AmbiguousInverse
///
/// A relationship whose inverse side is declared by more than one concrete
/// subclass. Classification resolves these by registration order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AmbiguousInverse {
    pub entity: &'static str,
    pub field: &'static str,
    pub candidates: Vec<&'static str>,
}

///
/// Catalog
///

#[derive(Debug)]
pub struct Catalog {
    entities: Vec<EntityEntry>,
    by_path: BTreeMap<&'static str, usize>,
    // entity path -> field names named by some relation's `mapped_by`
    referenced: BTreeMap<&'static str, BTreeSet<&'static str>>,
    ambiguous: Vec<AmbiguousInverse>,
}

#[derive(Debug)]
struct EntityEntry {
    model: &'static EntityModel,
    // nearest superclass first
    ancestors: Vec<&'static EntityModel>,
    // self, then every concrete descendant in registration order
    including: Vec<&'static EntityModel>,
    fields: Vec<ResolvedField>,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Registered entity models in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static EntityModel> + '_ {
        self.entities.iter().map(|entry| entry.model)
    }

    #[must_use]
    pub fn entity(&self, path: &str) -> Option<&'static EntityModel> {
        self.entry(path).map(|entry| entry.model)
    }

    /// The entity itself followed by every concrete entity whose superclass
    /// chain includes it.
    #[must_use]
    pub fn entities_by_super_including(&self, path: &str) -> &[&'static EntityModel] {
        self.entry(path)
            .map_or(&[][..], |entry| entry.including.as_slice())
    }

    /// Entities to search when resolving a relationship through `path`:
    /// just the entity when concrete, the full including set when abstract.
    #[must_use]
    pub fn relation_candidates(&self, path: &str) -> &[&'static EntityModel] {
        match self.entry(path) {
            Some(entry) if entry.model.is_abstract => entry.including.as_slice(),
            Some(entry) => &entry.including[..1],
            None => &[],
        }
    }

    /// Superclasses of `path`, nearest first.
    #[must_use]
    pub fn ancestors(&self, path: &str) -> &[&'static EntityModel] {
        self.entry(path)
            .map_or(&[][..], |entry| entry.ancestors.as_slice())
    }

    /// True when `path` is `ancestor` or inherits from it.
    #[must_use]
    pub fn is_assignable(&self, path: &str, ancestor: &str) -> bool {
        path == ancestor
            || self
                .ancestors(path)
                .iter()
                .any(|model| model.path == ancestor)
    }

    /// Every field visible on the entity, inherited fields first. A field
    /// redeclared by a subclass replaces the inherited one in place.
    #[must_use]
    pub fn fields(&self, path: &str) -> &[ResolvedField] {
        self.entry(path)
            .map_or(&[][..], |entry| entry.fields.as_slice())
    }

    #[must_use]
    pub fn resolve_field(&self, path: &str, name: &str) -> Option<ResolvedField> {
        self.fields(path)
            .iter()
            .find(|resolved| resolved.field.name == name)
            .copied()
    }

    #[must_use]
    pub fn field(&self, path: &str, name: &str) -> Option<&'static EntityFieldModel> {
        self.resolve_field(path, name).map(|resolved| resolved.field)
    }

    /// True when some relation names this field (on this entity or one of
    /// its superclasses) as its `mapped_by` inverse.
    #[must_use]
    pub fn is_referenced(&self, path: &str, field_name: &str) -> bool {
        let named = |entity: &str| {
            self.referenced
                .get(entity)
                .is_some_and(|fields| fields.contains(field_name))
        };

        named(path) || self.ancestors(path).iter().any(|model| named(model.path))
    }

    /// Find a field on `candidate` that points at `related_path` (or one of
    /// its superclasses) and names `field_name` as its inverse.
    #[must_use]
    pub fn field_with_mapped_by(
        &self,
        candidate: &EntityModel,
        related_path: &str,
        field_name: &str,
    ) -> Option<&'static EntityFieldModel> {
        self.fields(candidate.path)
            .iter()
            .map(|resolved| resolved.field)
            .find(|field| {
                field.inverse() == Some(field_name)
                    && field
                        .kind
                        .real_type()
                        .is_some_and(|target| self.is_assignable(related_path, target))
            })
    }

    #[must_use]
    pub fn has_field_with_mapped_by(
        &self,
        candidate: &EntityModel,
        related_path: &str,
        field_name: &str,
    ) -> bool {
        self.field_with_mapped_by(candidate, related_path, field_name)
            .is_some()
    }

    /// Relationships whose inverse resolves differently per subclass.
    #[must_use]
    pub fn ambiguous_inverses(&self) -> &[AmbiguousInverse] {
        &self.ambiguous
    }

    fn entry(&self, path: &str) -> Option<&EntityEntry> {
        self.by_path.get(path).map(|&idx| &self.entities[idx])
    }
}
