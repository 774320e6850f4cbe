use crate::{
    model::field::EntityFieldModel,
    module::{FeatureHandle, Features},
    obs::sink::{MetricsEvent, record},
    proxy::LoadError,
    value::{NULL, Value},
};

///
/// Resolution
/// Outcome of running a value through the proxy policy.
///

#[derive(Clone, Copy, Debug)]
pub enum Resolution<'v> {
    /// Write this value (the loaded target for a reference).
    Value(&'v Value),
    /// Write null in place of an unloaded value.
    Suppress,
}

impl Resolution<'_> {
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppress)
    }
}

///
/// ProxyPolicy
///
/// Decides, for lazy references and collections, whether to load them or
/// write null. The policy reads feature state from a shared handle, so a
/// policy obtained before a flag change honours the new flag on its next
/// call.
///

#[derive(Clone, Debug)]
pub struct ProxyPolicy {
    features: FeatureHandle,
}

impl ProxyPolicy {
    #[must_use]
    pub const fn new(features: FeatureHandle) -> Self {
        Self { features }
    }

    /// Current feature snapshot.
    #[must_use]
    pub fn features(&self) -> Features {
        self.features.load()
    }

    /// Resolve `value` against the current feature state.
    pub fn resolve<'v>(&self, value: &'v Value) -> Result<Resolution<'v>, LoadError> {
        self.resolve_with(value, self.features())
    }

    /// Resolve `value` against an explicit snapshot.
    pub fn resolve_with<'v>(
        &self,
        value: &'v Value,
        features: Features,
    ) -> Result<Resolution<'v>, LoadError> {
        let force = features.force_lazy_loading();

        match value {
            Value::Proxy(proxy) => {
                let was_loaded = proxy.is_initialized();
                if !force && !was_loaded {
                    record(MetricsEvent::ProxySuppressed);
                    return Ok(Resolution::Suppress);
                }

                let target = proxy.initialize_and_return_object().inspect_err(|err| {
                    log::warn!("lazy reference failed to load: {err}");
                })?;
                if !was_loaded {
                    record(MetricsEvent::ProxyLoaded);
                }

                Ok(Resolution::Value(target.unwrap_or(&NULL)))
            }
            Value::Collection(collection) => {
                let was_loaded = collection.is_initialized();
                if !force && !was_loaded {
                    record(MetricsEvent::CollectionSuppressed);
                    return Ok(Resolution::Suppress);
                }

                collection.initialize().inspect_err(|err| {
                    log::warn!("lazy collection failed to load: {err}");
                })?;
                if !was_loaded {
                    record(MetricsEvent::CollectionLoaded);
                }

                Ok(Resolution::Value(value))
            }
            _ => Ok(Resolution::Value(value)),
        }
    }

    /// Emptiness under the current feature state.
    pub fn is_empty(&self, value: &Value) -> Result<bool, LoadError> {
        self.is_empty_with(value, self.features())
    }

    /// A lazy collection is empty when it would be suppressed, otherwise
    /// when it has no elements (loading it if forced). An uninitialized
    /// reference is empty unless forced; an initialized one is empty when
    /// it resolved to nothing.
    pub fn is_empty_with(&self, value: &Value, features: Features) -> Result<bool, LoadError> {
        match value {
            Value::Collection(collection) => {
                if !features.force_lazy_loading() && !collection.is_initialized() {
                    return Ok(true);
                }

                Ok(collection.initialize()?.is_empty())
            }
            Value::Proxy(proxy) => Ok(match proxy.get() {
                Some(target) => target.as_ref().is_none_or(Value::is_null),
                None => !features.force_lazy_loading(),
            }),
            other => Ok(other.is_empty_value()),
        }
    }

    /// Whether a collection-typed property is treated as lazy. An explicit
    /// marker wins; unmarked properties are lazy unless explicit markers
    /// are required. No property (a value outside any property) is never
    /// lazy.
    #[must_use]
    pub fn uses_lazy_loading(&self, field: Option<&EntityFieldModel>, features: Features) -> bool {
        let Some(field) = field else {
            return false;
        };

        field
            .lazy
            .unwrap_or(!features.require_explicit_lazy_marker())
    }
}
