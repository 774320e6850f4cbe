//! Serializer configuration.
//!
//! Configuration is plain data: it can be built in code or read from JSON,
//! and every field has a default so partial documents are accepted.

use crate::{
    engine::{DEFAULT_MAX_DEPTH, Include},
    module::{Feature, Features},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("max_depth must be greater than zero")]
    InvalidMaxDepth,

    #[error("invalid serializer config: {0}")]
    Parse(#[from] serde_json::Error),
}

///
/// SerializerConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializerConfig {
    pub features: FeatureConfig,
    pub inclusion: Include,
    pub pretty: bool,
    pub max_depth: usize,
}

impl SerializerConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }

        Ok(())
    }
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            features: FeatureConfig::default(),
            inclusion: Include::default(),
            pretty: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

///
/// FeatureConfig
/// Feature switches by name; omitted switches take their defaults.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    pub force_lazy_loading: bool,
    pub use_transient_marker: bool,
    pub require_explicit_lazy_marker: bool,
}

impl FeatureConfig {
    #[must_use]
    pub const fn to_features(self) -> Features {
        Features::empty()
            .set(Feature::ForceLazyLoading, self.force_lazy_loading)
            .set(Feature::UseTransientMarker, self.use_transient_marker)
            .set(
                Feature::RequireExplicitLazyMarker,
                self.require_explicit_lazy_marker,
            )
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::from(Features::defaults())
    }
}

impl From<Features> for FeatureConfig {
    fn from(features: Features) -> Self {
        Self {
            force_lazy_loading: features.force_lazy_loading(),
            use_transient_marker: features.use_transient_marker(),
            require_explicit_lazy_marker: features.require_explicit_lazy_marker(),
        }
    }
}
