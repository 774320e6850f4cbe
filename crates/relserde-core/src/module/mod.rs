//! Persistence module: plugs relationship inference and lazy-value
//! handling into the serialization engine.

mod feature;


use crate::{
    catalog::Catalog,
    config::SerializerConfig,
    engine::{Mapper, Module, SerializeError, SetupContext},
    error::InternalError,
    proxy::{ProxyPolicy, ProxySerializerModifier, ProxySerializers},
    relation::{DirectionResolver, RelationIntrospector},
    value::Value,
};
use derive_more::Deref;
use serde_json::Value as JsonValue;
use std::{io, sync::Arc};

pub use feature::{Feature, FeatureHandle, Features};

///
/// PersistenceModule
///
/// Scoped to one catalog. Feature state lives in a shared handle: the
/// policies and serializers the module hands out read the same state, so a
/// toggle here applies to the next pass without re-registration.
///

#[derive(Clone, Debug)]
pub struct PersistenceModule {
    catalog: Arc<Catalog>,
    features: FeatureHandle,
}

impl PersistenceModule {
    pub const NAME: &'static str = "relserde-persistence";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_features(catalog, Features::defaults())
    }

    #[must_use]
    pub fn with_features(catalog: Arc<Catalog>, features: Features) -> Self {
        Self {
            catalog,
            features: FeatureHandle::new(features),
        }
    }

    pub fn enable(&self, feature: Feature) -> &Self {
        self.configure(feature, true)
    }

    pub fn disable(&self, feature: Feature) -> &Self {
        self.configure(feature, false)
    }

    pub fn configure(&self, feature: Feature, state: bool) -> &Self {
        let features = self.features.update(|current| current.set(feature, state));
        log::debug!("feature {feature} set to {state} (bits {:#x})", features.bits());

        self
    }

    /// Replace every switch at once.
    pub fn set_features(&self, features: Features) -> &Self {
        self.features.store(features);
        self
    }

    #[must_use]
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features().contains(feature)
    }

    /// Current snapshot.
    #[must_use]
    pub fn features(&self) -> Features {
        self.features.load()
    }

    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub fn resolver(&self) -> DirectionResolver {
        DirectionResolver::new(Arc::clone(&self.catalog))
    }

    /// Policy bound to this module's live feature state.
    #[must_use]
    pub fn proxy_policy(&self) -> ProxyPolicy {
        ProxyPolicy::new(self.features.clone())
    }
}

impl Module for PersistenceModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn version(&self) -> &'static str {
        Self::VERSION
    }

    fn setup(&self, ctx: &mut SetupContext<'_>) {
        if !Arc::ptr_eq(ctx.catalog(), &self.catalog) {
            log::warn!("persistence module registered with a mapper over a different catalog");
        }

        ctx.set_features(self.features.clone());
        ctx.append_introspector(Arc::new(RelationIntrospector::new(self.resolver())));
        ctx.add_serializer_modifier(Arc::new(ProxySerializerModifier::new(self.proxy_policy())));

        let default = ctx.default_serializer();
        ctx.add_serializers(Arc::new(ProxySerializers::new(
            Some(default),
            self.proxy_policy(),
        )));
    }
}

///
/// EntityMapper
///
/// A mapper with the persistence module registered. Feature toggles made
/// here go through the module and reach the mapper's next pass.
///

#[derive(Debug, Deref)]
pub struct EntityMapper {
    #[deref]
    mapper: Mapper,
    module: PersistenceModule,
}

impl EntityMapper {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_module(PersistenceModule::new(catalog))
    }

    #[must_use]
    pub fn with_module(module: PersistenceModule) -> Self {
        let mut mapper = Mapper::new(Arc::clone(module.catalog()));
        mapper.register_module(&module);

        Self { mapper, module }
    }

    /// Build from configuration, validating it first.
    pub fn from_config(
        catalog: Arc<Catalog>,
        config: &SerializerConfig,
    ) -> Result<Self, InternalError> {
        config.validate()?;

        let module = PersistenceModule::with_features(catalog, config.features.to_features());
        let mut entity_mapper = Self::with_module(module);
        entity_mapper.mapper.configure(config);

        Ok(entity_mapper)
    }

    pub fn enable(&self, feature: Feature) -> &Self {
        self.module.enable(feature);
        self
    }

    pub fn disable(&self, feature: Feature) -> &Self {
        self.module.disable(feature);
        self
    }

    pub fn configure(&self, feature: Feature, state: bool) -> &Self {
        self.module.configure(feature, state);
        self
    }

    #[must_use]
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.module.is_enabled(feature)
    }

    #[must_use]
    pub const fn module(&self) -> &PersistenceModule {
        &self.module
    }

    /// Engine access for settings such as inclusion and depth.
    pub const fn mapper_mut(&mut self) -> &mut Mapper {
        &mut self.mapper
    }

    pub fn write_value(&self, value: &Value) -> Result<JsonValue, SerializeError> {
        self.mapper.to_json_value(value)
    }

    pub fn write_string(&self, value: &Value) -> Result<String, SerializeError> {
        self.mapper.to_string(value)
    }

    pub fn write_to<W: io::Write>(&self, writer: W, value: &Value) -> Result<(), SerializeError> {
        self.mapper.to_writer(writer, value)
    }
}
