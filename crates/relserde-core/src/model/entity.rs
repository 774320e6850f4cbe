use crate::model::field::EntityFieldModel;

///
/// EntityModel
/// Declarative runtime model for one mapped entity type.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified type path (identity in the catalog).
    pub path: &'static str,
    /// Stable external name used in diagnostics.
    pub entity_name: &'static str,
    /// Abstract entities are never instantiated; relation lookups expand
    /// them to their concrete subclasses.
    pub is_abstract: bool,
    /// Path of the mapped superclass, if any.
    pub super_path: Option<&'static str>,
    /// Fields declared directly on this entity (inherited fields excluded).
    pub fields: &'static [EntityFieldModel],
}

impl EntityModel {
    #[must_use]
    pub const fn new(
        path: &'static str,
        entity_name: &'static str,
        fields: &'static [EntityFieldModel],
    ) -> Self {
        Self {
            path,
            entity_name,
            is_abstract: false,
            super_path: None,
            fields,
        }
    }

    #[must_use]
    pub const fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub const fn extends(mut self, super_path: &'static str) -> Self {
        self.super_path = Some(super_path);
        self
    }

    /// Look up a field declared directly on this entity.
    #[must_use]
    pub fn declared_field(&self, name: &str) -> Option<&'static EntityFieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// True when a field declared here points at `related_path` and names
    /// `field_name` as its inverse.
    #[must_use]
    pub fn has_declared_field_with_mapped_by(&self, related_path: &str, field_name: &str) -> bool {
        self.fields.iter().any(|field| {
            field.mapped_by == Some(field_name) && field.kind.real_type() == Some(related_path)
        })
    }
}

///
/// EntityKind
/// Rust type bound to a static entity model.
///

pub trait EntityKind {
    const MODEL: &'static EntityModel;
}
