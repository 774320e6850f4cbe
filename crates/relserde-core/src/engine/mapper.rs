use crate::{
    catalog::Catalog,
    config::SerializerConfig,
    engine::{
        DefaultValueSerializer, EntityPlan, Introspector, Provider, SerializeError,
        SerializerModifier, Serializers, ValueSerializer, introspect::IntrospectorChain,
        plan::PlanBuilder,
    },
    model::entity::EntityModel,
    module::{FeatureHandle, Features},
    obs::sink::{MetricsEvent, record},
    value::{Value, ValueKind},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::{
    collections::BTreeMap,
    fmt, io,
    sync::{Arc, PoisonError, RwLock},
};

/// Default nesting limit for entity output.
pub const DEFAULT_MAX_DEPTH: usize = 64;

///
/// Include
/// Which properties are written.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Include {
    /// Every property, nulls included.
    #[default]
    Always,
    /// Properties whose output is not null.
    NonNull,
    /// Properties that are neither null nor empty.
    NonEmpty,
}

///
/// Module
/// Extension registered with a mapper.
///

pub trait Module {
    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    fn setup(&self, ctx: &mut SetupContext<'_>);
}

///
/// SetupContext
/// Registration surface handed to `Module::setup`.
///

pub struct SetupContext<'a> {
    mapper: &'a mut Mapper,
}

impl SetupContext<'_> {
    pub fn append_introspector(&mut self, introspector: Arc<dyn Introspector>) {
        self.mapper.introspectors.append(introspector);
    }

    pub fn add_serializer_modifier(&mut self, modifier: Arc<dyn SerializerModifier>) {
        self.mapper.modifiers.push(modifier);
    }

    pub fn add_serializers(&mut self, serializers: Arc<dyn Serializers>) {
        self.mapper.serializers.push(serializers);
    }

    /// Feature state read at the start of every pass.
    pub fn set_features(&mut self, features: FeatureHandle) {
        self.mapper.features = Some(features);
    }

    #[must_use]
    pub fn default_serializer(&self) -> Arc<dyn ValueSerializer> {
        Arc::clone(&self.mapper.default_serializer)
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.mapper.catalog
    }
}

///
/// Mapper
///
/// Writes runtime values as JSON. Entity plans are built on first use for
/// each (entity, feature snapshot) pair and cached; registering a module
/// clears the cache.
///

pub struct Mapper {
    catalog: Arc<Catalog>,
    introspectors: IntrospectorChain,
    modifiers: Vec<Arc<dyn SerializerModifier>>,
    serializers: Vec<Arc<dyn Serializers>>,
    default_serializer: Arc<dyn ValueSerializer>,
    features: Option<FeatureHandle>,
    modules: Vec<&'static str>,
    inclusion: Include,
    pretty: bool,
    max_depth: usize,
    plans: RwLock<BTreeMap<(&'static str, Features), Arc<EntityPlan>>>,
}

impl Mapper {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            introspectors: IntrospectorChain::default(),
            modifiers: Vec::new(),
            serializers: Vec::new(),
            default_serializer: Arc::new(DefaultValueSerializer),
            features: None,
            modules: Vec::new(),
            inclusion: Include::default(),
            pretty: false,
            max_depth: DEFAULT_MAX_DEPTH,
            plans: RwLock::new(BTreeMap::new()),
        }
    }

    /// Apply the engine-level settings of `config`. Feature switches are
    /// left to the module.
    pub fn configure(&mut self, config: &SerializerConfig) -> &mut Self {
        self.inclusion = config.inclusion;
        self.pretty = config.pretty;
        self.set_max_depth(config.max_depth);
        self.clear_plans();
        self
    }

    /// Register a module. A module whose name is already registered is
    /// ignored.
    pub fn register_module(&mut self, module: &dyn Module) -> &mut Self {
        let name = module.name();
        if self.modules.contains(&name) {
            log::debug!("module '{name}' already registered");
            return self;
        }

        module.setup(&mut SetupContext { mapper: self });
        self.modules.push(name);
        self.clear_plans();

        log::debug!(
            "registered module '{name}' v{} ({} introspectors, {} modifiers)",
            module.version(),
            self.introspectors.len(),
            self.modifiers.len()
        );

        self
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.modules.iter().any(|module| *module == name)
    }

    pub const fn set_inclusion(&mut self, inclusion: Include) -> &mut Self {
        self.inclusion = inclusion;
        self
    }

    pub const fn set_pretty(&mut self, pretty: bool) -> &mut Self {
        self.pretty = pretty;
        self
    }

    /// Nesting limit for entity output; zero is raised to one.
    pub const fn set_max_depth(&mut self, max_depth: usize) -> &mut Self {
        self.max_depth = if max_depth == 0 { 1 } else { max_depth };
        self
    }

    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub const fn inclusion(&self) -> Include {
        self.inclusion
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Feature snapshot a pass started now would use.
    #[must_use]
    pub fn features(&self) -> Features {
        self.features
            .as_ref()
            .map_or_else(Features::defaults, FeatureHandle::load)
    }

    /// Plan for `entity` under `features`, built on first use.
    #[must_use]
    pub fn plan_for(&self, entity: &'static EntityModel, features: Features) -> Arc<EntityPlan> {
        let key = (entity.path, features);
        if let Some(plan) = self
            .plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(plan);
        }

        let plan = Arc::new(
            PlanBuilder {
                catalog: &self.catalog,
                introspectors: &self.introspectors,
                modifiers: &self.modifiers,
                default_serializer: &self.default_serializer,
            }
            .build(entity, features),
        );

        log::debug!(
            "built plan for '{}' with {} properties",
            entity.path,
            plan.len()
        );
        record(MetricsEvent::PlanBuilt {
            entity_path: entity.path,
            properties: plan.len(),
        });

        let mut plans = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(plans.entry(key).or_insert(plan))
    }

    /// Serializer for a value reached outside a planned property.
    pub(crate) fn value_serializer(&self, kind: ValueKind) -> Arc<dyn ValueSerializer> {
        self.serializers
            .iter()
            .find_map(|serializers| serializers.find_serializer(kind))
            .unwrap_or_else(|| Arc::clone(&self.default_serializer))
    }

    pub fn to_json_value(&self, value: &Value) -> Result<JsonValue, SerializeError> {
        let features = self.features();
        let mut provider = Provider::new(self, features);

        record(MetricsEvent::PassStart);
        log::trace!("serialization pass with features {:#x}", features.bits());

        let result = provider.serialize_value(value);
        record(MetricsEvent::PassFinish {
            ok: result.is_ok(),
        });

        result
    }

    pub fn to_string(&self, value: &Value) -> Result<String, SerializeError> {
        let json = self.to_json_value(value)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };

        Ok(text)
    }

    pub fn to_writer<W: io::Write>(&self, writer: W, value: &Value) -> Result<(), SerializeError> {
        let json = self.to_json_value(value)?;
        if self.pretty {
            serde_json::to_writer_pretty(writer, &json)?;
        } else {
            serde_json::to_writer(writer, &json)?;
        }

        Ok(())
    }

    fn clear_plans(&self) {
        self.plans
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("modules", &self.modules)
            .field("inclusion", &self.inclusion)
            .field("pretty", &self.pretty)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
