use crate::{
    catalog::Catalog,
    engine::{
        PropertyContext, ValueSerializer, introspect::IntrospectorChain,
        serializer::SerializerModifier,
    },
    model::entity::EntityModel,
    module::Features,
    relation::ReferenceDirection,
};
use derive_more::Deref;
use std::sync::Arc;

///
/// EntityPlan
/// Ordered, fully resolved properties of one entity type.
///

#[derive(Debug, Deref)]
pub struct EntityPlan {
    pub entity: &'static EntityModel,
    #[deref]
    properties: Vec<PropertyPlan>,
}

impl EntityPlan {
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyPlan> {
        self.properties.iter().find(|property| property.name() == name)
    }
}

///
/// PropertyPlan
///

#[derive(Debug)]
pub struct PropertyPlan {
    pub context: PropertyContext,
    pub direction: ReferenceDirection,
    pub serializer: Arc<dyn ValueSerializer>,
}

impl PropertyPlan {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.context.name()
    }
}

///
/// PlanBuilder
/// Borrowed view of the mapper state needed to build one plan.
///

pub(crate) struct PlanBuilder<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) introspectors: &'a IntrospectorChain,
    pub(crate) modifiers: &'a [Arc<dyn SerializerModifier>],
    pub(crate) default_serializer: &'a Arc<dyn ValueSerializer>,
}

impl PlanBuilder<'_> {
    pub(crate) fn build(&self, entity: &'static EntityModel, features: Features) -> EntityPlan {
        // entities the catalog does not know are written from their own
        // declared fields, without relationship metadata
        let contexts: Vec<PropertyContext> = if self.catalog.entity(entity.path).is_some() {
            self.catalog
                .fields(entity.path)
                .iter()
                .map(|resolved| PropertyContext::new(entity, resolved.declaring, resolved.field))
                .collect()
        } else {
            log::debug!(
                "entity '{}' is not registered; planning declared fields only",
                entity.path
            );
            entity
                .fields
                .iter()
                .map(|field| PropertyContext::new(entity, entity, field))
                .collect()
        };

        let properties = contexts
            .into_iter()
            .filter(|context| {
                let ignored = self.introspectors.is_ignored(context, features);
                if ignored {
                    log::trace!("ignoring {}", context.property_ref());
                }
                !ignored
            })
            .map(|context| self.property(context, features))
            .collect();

        EntityPlan { entity, properties }
    }

    fn property(&self, context: PropertyContext, features: Features) -> PropertyPlan {
        let direction = self.introspectors.reference_direction(&context);

        let serializer = self
            .modifiers
            .iter()
            .fold(Arc::clone(self.default_serializer), |serializer, modifier| {
                modifier.modify(&context, serializer)
            });
        let serializer = serializer
            .contextualize(&context, features)
            .unwrap_or(serializer);

        log::trace!("planned {} as {direction:?}", context.property_ref());

        PropertyPlan {
            context,
            direction,
            serializer,
        }
    }
}
