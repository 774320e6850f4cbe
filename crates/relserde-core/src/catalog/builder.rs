use super::{AmbiguousInverse, Catalog, CatalogError, EntityEntry, ResolvedField};
use crate::model::entity::{EntityKind, EntityModel};
use std::collections::{BTreeMap, BTreeSet};

///
/// CatalogBuilder
///
/// Collects entity models and computes the catalog lookup tables.
/// Registration order is preserved and decides first-match resolution.
///

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    models: Vec<&'static EntityModel>,
}

impl CatalogBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { models: Vec::new() }
    }

    #[must_use]
    pub fn register(mut self, model: &'static EntityModel) -> Self {
        self.models.push(model);
        self
    }

    #[must_use]
    pub fn register_kind<E: EntityKind>(self) -> Self {
        self.register(E::MODEL)
    }

    #[must_use]
    pub fn register_all(mut self, models: impl IntoIterator<Item = &'static EntityModel>) -> Self {
        self.models.extend(models);
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        let models = self.models;

        let mut by_path = BTreeMap::new();
        for (idx, model) in models.iter().enumerate() {
            if by_path.insert(model.path, idx).is_some() {
                return Err(CatalogError::DuplicateEntity { path: model.path });
            }
        }

        let ancestors = models
            .iter()
            .map(|model| ancestors_of(model, &models, &by_path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut entities = Vec::with_capacity(models.len());
        for (idx, &model) in models.iter().enumerate() {
            let mut including = vec![model];
            including.extend(
                models
                    .iter()
                    .zip(&ancestors)
                    .filter(|(candidate, chain)| {
                        !candidate.is_abstract && chain.iter().any(|a| a.path == model.path)
                    })
                    .map(|(&candidate, _)| candidate),
            );

            entities.push(EntityEntry {
                model,
                fields: visible_fields(model, &ancestors[idx]),
                ancestors: ancestors[idx].clone(),
                including,
            });
        }

        let mut referenced: BTreeMap<&'static str, BTreeSet<&'static str>> = BTreeMap::new();
        for model in &models {
            for field in model.fields {
                if let (Some(inverse), Some(target)) = (field.inverse(), field.kind.real_type()) {
                    referenced.entry(target).or_default().insert(inverse);
                }
            }
        }

        let mut catalog = Catalog {
            entities,
            by_path,
            referenced,
            ambiguous: Vec::new(),
        };

        check_inverse_targets(&catalog);
        catalog.ambiguous = find_ambiguous_inverses(&catalog);

        for ambiguous in &catalog.ambiguous {
            log::warn!(
                "ambiguous inverse for {}.{}: candidates {:?}, first registered wins",
                ambiguous.entity,
                ambiguous.field,
                ambiguous.candidates,
            );
        }

        Ok(catalog)
    }
}

// Walk the superclass chain, nearest first.
fn ancestors_of(
    model: &'static EntityModel,
    models: &[&'static EntityModel],
    by_path: &BTreeMap<&'static str, usize>,
) -> Result<Vec<&'static EntityModel>, CatalogError> {
    let mut chain = Vec::new();
    let mut seen = BTreeSet::from([model.path]);
    let mut current = model;

    while let Some(super_path) = current.super_path {
        let Some(&idx) = by_path.get(super_path) else {
            return Err(CatalogError::UnknownSuper {
                path: current.path,
                super_path,
            });
        };
        if !seen.insert(super_path) {
            return Err(CatalogError::InheritanceCycle { path: model.path });
        }

        current = models[idx];
        chain.push(current);
    }

    Ok(chain)
}

// Inherited fields first (root-most superclass first); redeclared fields
// replace the inherited entry in place.
fn visible_fields(
    model: &'static EntityModel,
    ancestors: &[&'static EntityModel],
) -> Vec<ResolvedField> {
    let mut fields: Vec<ResolvedField> = Vec::new();

    for &declaring in ancestors.iter().rev().chain(std::iter::once(&model)) {
        for field in declaring.fields {
            let resolved = ResolvedField { declaring, field };
            match fields.iter_mut().find(|f| f.field.name == field.name) {
                Some(slot) => *slot = resolved,
                None => fields.push(resolved),
            }
        }
    }

    fields
}

fn check_inverse_targets(catalog: &Catalog) {
    for model in catalog.iter() {
        for field in model.fields {
            let (Some(inverse), Some(target)) = (field.inverse(), field.kind.real_type()) else {
                continue;
            };
            if catalog.entity(target).is_none() {
                log::warn!(
                    "{}.{} targets unregistered entity '{target}'",
                    model.path,
                    field.name
                );
                continue;
            }

            let declared = catalog
                .entities_by_super_including(target)
                .iter()
                .any(|candidate| catalog.field(candidate.path, inverse).is_some());
            if !declared {
                log::warn!(
                    "{}.{} is mapped by '{inverse}', which no '{target}' entity declares",
                    model.path,
                    field.name
                );
            }
        }
    }
}

fn find_ambiguous_inverses(catalog: &Catalog) -> Vec<AmbiguousInverse> {
    let mut found = Vec::new();

    for model in catalog.iter() {
        for field in model.fields {
            // managed side declared on an abstract entity
            if model.is_abstract {
                let owners = catalog
                    .relation_candidates(model.path)
                    .iter()
                    .filter_map(|candidate| {
                        catalog
                            .field(candidate.path, field.name)
                            .and_then(|f| f.inverse())
                            .map(|inverse| (candidate.path, inverse))
                    })
                    .collect::<Vec<_>>();
                push_if_ambiguous(&mut found, model.path, field.name, &owners);
            }

            // single-valued inverse side pointing at an abstract entity
            if field.is_reference()
                && field.is_not_array_or_collection()
                && let Some(related) = field.kind.real_type()
            {
                let owners = catalog
                    .relation_candidates(related)
                    .iter()
                    .filter_map(|candidate| {
                        catalog
                            .field_with_mapped_by(candidate, model.path, field.name)
                            .map(|owner| (candidate.path, owner.name))
                    })
                    .collect::<Vec<_>>();
                push_if_ambiguous(&mut found, model.path, field.name, &owners);
            }
        }
    }

    found
}

fn push_if_ambiguous(
    found: &mut Vec<AmbiguousInverse>,
    entity: &'static str,
    field: &'static str,
    owners: &[(&'static str, &'static str)],
) {
    let distinct = owners
        .iter()
        .map(|(_, name)| *name)
        .collect::<BTreeSet<_>>();

    if distinct.len() > 1 {
        found.push(AmbiguousInverse {
            entity,
            field,
            candidates: owners.iter().map(|(path, _)| *path).collect(),
        });
    }
}
