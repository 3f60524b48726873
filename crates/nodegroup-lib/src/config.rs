//! Resolver configuration

use crate::error::ConfigError;
use crate::keys::{AnnotationKeys, DEFAULT_CAPI_GROUP};
use serde::Deserialize;

/// Process-wide resolver settings, loaded once at startup
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Cluster-api group qualifying node-group keys (`CAPI_GROUP`)
    #[serde(default = "default_group")]
    pub group: String,
}

fn default_group() -> String {
    DEFAULT_CAPI_GROUP.to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            group: default_group(),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from `CAPI_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(::config::Environment::with_prefix("CAPI"))
    }

    fn load_from(env: ::config::Environment) -> Result<Self, ConfigError> {
        let config = ::config::Config::builder().add_source(env).build()?;
        let loaded: Self = config.try_deserialize()?;

        tracing::debug!(group = %loaded.group, "Resolved cluster-api group");
        Ok(loaded)
    }

    /// Derive the immutable key set for this configuration
    pub fn keys(&self) -> AnnotationKeys {
        AnnotationKeys::new(self.group.clone())
    }
}
