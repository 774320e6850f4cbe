use serde::Serialize;

///
/// EntityFieldModel
/// Runtime field metadata used by direction inference and plan building.
///

#[derive(Debug)]
pub struct EntityFieldModel {
    /// Field name as written to output.
    pub name: &'static str,
    /// Runtime shape of the field.
    pub kind: EntityFieldKind,
    /// Inverse field on the related entity (owning side only).
    pub mapped_by: Option<&'static str>,
    /// Explicit per-property lazy/eager marker.
    pub lazy: Option<bool>,
    /// Excluded from output when the transient marker is honoured.
    pub transient: bool,
}

impl EntityFieldModel {
    #[must_use]
    pub const fn value(name: &'static str) -> Self {
        Self::with_kind(name, EntityFieldKind::Value)
    }

    #[must_use]
    pub const fn list(name: &'static str) -> Self {
        Self::with_kind(name, EntityFieldKind::List)
    }

    #[must_use]
    pub const fn one(name: &'static str, target: &'static str) -> Self {
        Self::with_kind(
            name,
            EntityFieldKind::Relation {
                target,
                cardinality: Cardinality::One,
            },
        )
    }

    #[must_use]
    pub const fn many(name: &'static str, target: &'static str) -> Self {
        Self::with_kind(
            name,
            EntityFieldKind::Relation {
                target,
                cardinality: Cardinality::Many,
            },
        )
    }

    #[must_use]
    pub const fn with_kind(name: &'static str, kind: EntityFieldKind) -> Self {
        Self {
            name,
            kind,
            mapped_by: None,
            lazy: None,
            transient: false,
        }
    }

    #[must_use]
    pub const fn mapped_by(mut self, inverse: &'static str) -> Self {
        self.mapped_by = Some(inverse);
        self
    }

    #[must_use]
    pub const fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(lazy);
        self
    }

    #[must_use]
    pub const fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Non-empty inverse field name, if this is the owning side.
    #[must_use]
    pub fn inverse(&self) -> Option<&'static str> {
        self.mapped_by.filter(|name| !name.is_empty())
    }

    #[must_use]
    pub fn is_mapped_by(&self) -> bool {
        self.inverse().is_some()
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.kind.is_reference()
    }

    #[must_use]
    pub const fn is_not_array_or_collection(&self) -> bool {
        !self.kind.is_collection()
    }
}

///
/// EntityFieldKind
///
/// Minimal type surface needed for relationship inference.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum EntityFieldKind {
    /// Plain scalar or embedded value.
    Value,
    /// Array or collection of plain values.
    List,
    /// Reference to another mapped entity.
    Relation {
        target: &'static str,
        cardinality: Cardinality,
    },
}

impl EntityFieldKind {
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Relation { .. })
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(
            self,
            Self::List
                | Self::Relation {
                    cardinality: Cardinality::Many,
                    ..
                }
        )
    }

    /// Related entity path for relation fields.
    #[must_use]
    pub const fn real_type(&self) -> Option<&'static str> {
        match self {
            Self::Relation { target, .. } => Some(*target),
            Self::Value | Self::List => None,
        }
    }
}

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Cardinality {
    One,
    Many,
}
