use crate::model::{entity::EntityModel, field::EntityFieldModel};
use derive_more::Display;

///
/// PropertyContext
///
/// One property as seen while building a plan: the entity being written,
/// the entity that declares the field (a superclass when inherited), and the
/// field model itself.
///

#[derive(Clone, Copy, Debug)]
pub struct PropertyContext {
    pub entity: &'static EntityModel,
    pub declaring: &'static EntityModel,
    pub field: &'static EntityFieldModel,
}

impl PropertyContext {
    #[must_use]
    pub const fn new(
        entity: &'static EntityModel,
        declaring: &'static EntityModel,
        field: &'static EntityFieldModel,
    ) -> Self {
        Self {
            entity,
            declaring,
            field,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.field.name
    }

    #[must_use]
    pub const fn property_ref(&self) -> PropertyRef {
        PropertyRef {
            entity: self.entity.path,
            field: self.field.name,
        }
    }
}

///
/// PropertyRef
/// Owning entity and field name, used for error context.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("{entity}.{field}")]
pub struct PropertyRef {
    pub entity: &'static str,
    pub field: &'static str,
}

impl PropertyRef {
    /// Values written outside any entity property.
    pub const ROOT: Self = Self {
        entity: "<root>",
        field: "<value>",
    };
}
