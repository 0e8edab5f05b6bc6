//! Scene definitions
//!
//! A scene file lists entities, each with an optional unique name, an
//! optional prefab, and component literals keyed by registered type name.
//! Component literals stay untyped [`Node`]s until the loader decodes them.
//!
//! ```toml
//! name = "level1"
//!
//! [[entities]]
//! name = "player"
//! prefab = "character"
//! components.Follow = { target = { ref = { entity = "door" } } }
//! ```

use crate::error::Result;
use crate::prefab::PrefabDef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use void_ir::Node;

/// Root scene definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    /// Scene name; entities are tagged with it once loaded
    pub name: String,

    /// Prefabs declared alongside the scene
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefabs: Vec<PrefabDef>,

    /// Entity definitions, in placeholder order
    #[serde(default)]
    pub entities: Vec<EntityDef>,
}

/// One entity of a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Unique name within the world
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Prefab supplying default components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefab: Option<String>,

    /// Component literals (overrides when a prefab is set)
    #[serde(default)]
    pub components: BTreeMap<String, Node>,
}

impl SceneDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append an entity
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.push(entity);
        self
    }

    /// Append a prefab declaration
    pub fn with_prefab(mut self, prefab: PrefabDef) -> Self {
        self.prefabs.push(prefab);
        self
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a scene file; `.json` files are read as JSON, anything else as TOML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }
}

impl EntityDef {
    /// An unnamed entity
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_prefab(mut self, prefab: impl Into<String>) -> Self {
        self.prefab = Some(prefab.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<String>, literal: impl Into<Node>) -> Self {
        self.components.insert(component.into(), literal.into());
        self
    }

    /// Label used in diagnostics: the name, or the placeholder slot
    pub fn label(&self, slot: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", slot),
        }
    }
}
