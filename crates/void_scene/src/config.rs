//! Scene loader configuration

use serde::{Deserialize, Serialize};
use void_decode::DecoderConfig;

/// Scene loader configuration
///
/// ```toml
/// collect_all_errors = true
///
/// [decoder]
/// union_mode = "strict"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLoaderConfig {
    /// Component decoding options
    pub decoder: DecoderConfig,

    /// Report every component that fails to decode instead of only the first
    pub collect_all_errors: bool,

    /// Let named references resolve to entities loaded by other scenes
    pub allow_external_references: bool,
}

impl Default for SceneLoaderConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderConfig::default(),
            collect_all_errors: true,
            allow_external_references: false,
        }
    }
}

impl SceneLoaderConfig {
    /// Read a configuration from TOML; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_collect_all_errors(mut self, enabled: bool) -> Self {
        self.collect_all_errors = enabled;
        self
    }

    pub fn with_external_references(mut self, enabled: bool) -> Self {
        self.allow_external_references = enabled;
        self
    }
}
