use crate::{
    engine::{
        EntityPlan, Include, Mapper, PropertyPlan, PropertyRef, SerializeError, ValueSerializer,
    },
    module::Features,
    obs::sink::{MetricsEvent, record},
    proxy::LoadError,
    relation::ReferenceDirection,
    value::{EntityValue, Value},
};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

///
/// Provider
///
/// Per-pass serialization state. A provider is created for each top-level
/// write and carries the feature snapshot taken when the pass started, so
/// flag changes mid-pass never mix two configurations.
///

pub struct Provider<'m> {
    mapper: &'m Mapper,
    features: Features,
    depth: usize,
    path: Vec<PropertyRef>,
    // Some(name) while writing the content of a managed property: the
    // entity entered next omits its back-reference called `name`
    back_stack: Vec<Option<&'static str>>,
}

impl<'m> Provider<'m> {
    pub(crate) const fn new(mapper: &'m Mapper, features: Features) -> Self {
        Self {
            mapper,
            features,
            depth: 0,
            path: Vec::new(),
            back_stack: Vec::new(),
        }
    }

    /// Feature snapshot for this pass.
    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    /// Entity nesting depth at the current position.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Property currently being written, or `PropertyRef::ROOT`.
    #[must_use]
    pub fn current_property(&self) -> PropertyRef {
        self.path.last().copied().unwrap_or(PropertyRef::ROOT)
    }

    #[must_use]
    pub const fn serialize_null(&self) -> JsonValue {
        JsonValue::Null
    }

    /// Wrap a loader failure with the current property.
    #[must_use]
    pub fn load_error(&self, source: LoadError) -> SerializeError {
        record(MetricsEvent::LoadFailed);

        SerializeError::ProxyUnwrap {
            property: self.current_property(),
            source,
        }
    }

    /// Write a value reached outside a planned property, consulting the
    /// value-level serializers first.
    pub fn serialize_value(&mut self, value: &Value) -> Result<JsonValue, SerializeError> {
        let serializer = self.mapper.value_serializer(value.kind());

        serializer.serialize(value, self)
    }

    pub fn serialize_items(&mut self, items: &[Value]) -> Result<JsonValue, SerializeError> {
        items
            .iter()
            .map(|item| self.serialize_value(item))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array)
    }

    pub fn serialize_entity(&mut self, entity: &EntityValue) -> Result<JsonValue, SerializeError> {
        let limit = self.mapper.max_depth();
        if self.depth >= limit {
            return Err(SerializeError::DepthLimit {
                limit,
                entity: entity.path(),
            });
        }

        let plan = self.mapper.plan_for(entity.model(), self.features);
        let skip_back = self.back_stack.last().copied().flatten();

        self.depth += 1;
        self.back_stack.push(None);
        let written = self.write_properties(&plan, entity, skip_back);
        self.back_stack.pop();
        self.depth -= 1;

        if written.is_ok() {
            record(MetricsEvent::EntityWritten {
                entity_path: entity.path(),
            });
        }

        written
    }

    fn write_properties(
        &mut self,
        plan: &Arc<EntityPlan>,
        entity: &EntityValue,
        skip_back: Option<&'static str>,
    ) -> Result<JsonValue, SerializeError> {
        let mut object = Map::new();

        for property in plan.iter() {
            let Some(value) = entity.get(property.name()) else {
                continue;
            };

            if property.direction.is_back() && skip_back == Some(property.name()) {
                log::trace!(
                    "skipping back-reference {}.{}",
                    plan.entity.path,
                    property.name()
                );
                record(MetricsEvent::BackReferenceSkipped {
                    entity_path: plan.entity.path,
                    field: property.name(),
                });
                continue;
            }

            self.path.push(property.context.property_ref());
            let written = self.write_property(property, value);
            self.path.pop();

            if let Some(json) = written? {
                object.insert(property.name().to_string(), json);
            }
        }

        Ok(JsonValue::Object(object))
    }

    // None when the inclusion policy leaves the property out.
    fn write_property(
        &mut self,
        property: &PropertyPlan,
        value: &Value,
    ) -> Result<Option<JsonValue>, SerializeError> {
        let inclusion = self.mapper.inclusion();
        let serializer: &dyn ValueSerializer = property.serializer.as_ref();

        if inclusion == Include::NonEmpty && serializer.is_empty(value, self)? {
            return Ok(None);
        }

        let managed = match property.direction {
            ReferenceDirection::Managed { inverse } => Some(inverse),
            ReferenceDirection::None | ReferenceDirection::Back { .. } => None,
        };

        self.back_stack.push(managed);
        let json = serializer.serialize(value, self);
        self.back_stack.pop();
        let json = json?;

        if json.is_null() && inclusion != Include::Always {
            return Ok(None);
        }

        Ok(Some(json))
    }
}
