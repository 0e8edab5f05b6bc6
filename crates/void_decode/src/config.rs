//! Decoder configuration

use serde::{Deserialize, Serialize};

/// How union literals without an explicit variant are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionMode {
    /// Only bare tags and `{variant: payload}` selectors are accepted
    Strict,
    /// Additionally pick the first variant whose required fields are all present
    #[default]
    Relaxed,
}

/// Decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Union resolution mode
    pub union_mode: UnionMode,

    /// Log a warning when a relaxed match had several candidates
    pub warn_on_ambiguous: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            union_mode: UnionMode::Relaxed,
            warn_on_ambiguous: true,
        }
    }
}

impl DecoderConfig {
    /// Explicit variant syntax only
    pub fn strict() -> Self {
        Self {
            union_mode: UnionMode::Strict,
            ..Default::default()
        }
    }

    /// Structural variant matching allowed
    pub fn relaxed() -> Self {
        Self::default()
    }

    /// Read a configuration from TOML; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Set the union mode
    pub fn with_union_mode(mut self, mode: UnionMode) -> Self {
        self.union_mode = mode;
        self
    }

    /// Toggle ambiguity warnings
    pub fn with_ambiguity_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_ambiguous = enabled;
        self
    }
}
