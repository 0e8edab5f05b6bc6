//! Prefabs
//!
//! A prefab is a named set of default component literals. Prefabs may
//! extend another prefab; the chain is resolved base first and each level's
//! components are merged over the previous one with [`merge_component`], so
//! a union component can switch to another variant at any level.

use crate::definition::EntityDef;
use crate::error::{Result, SceneError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use void_decode::merge_component;
use void_ir::Node;
use void_schema::SchemaRegistry;

/// A reusable default component set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefabDef {
    pub name: String,

    /// Prefab whose components this one builds on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(default)]
    pub components: BTreeMap<String, Node>,
}

impl PrefabDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn extending(mut self, base: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<String>, literal: impl Into<Node>) -> Self {
        self.components.insert(component.into(), literal.into());
        self
    }
}

/// Registered prefabs by name
#[derive(Debug, Clone, Default)]
pub struct PrefabLibrary {
    prefabs: HashMap<String, PrefabDef>,
}

impl PrefabLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a library from TOML with one `[[prefabs]]` table per prefab
    pub fn from_toml_str(source: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct PrefabFile {
            #[serde(default)]
            prefabs: Vec<PrefabDef>,
        }

        let file: PrefabFile = toml::from_str(source)?;
        let mut library = Self::new();
        for prefab in file.prefabs {
            library.register(prefab)?;
        }
        Ok(library)
    }

    /// Register a prefab. Names are unique.
    pub fn register(&mut self, prefab: PrefabDef) -> Result<()> {
        if self.prefabs.contains_key(&prefab.name) {
            return Err(SceneError::DuplicatePrefab(prefab.name));
        }
        log::debug!("Registered prefab '{}'", prefab.name);
        self.prefabs.insert(prefab.name.clone(), prefab);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PrefabDef> {
        self.prefabs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prefabs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// The `extends` chain of `name`, base first, `name` last
    pub fn chain(&self, name: &str) -> Result<Vec<&PrefabDef>> {
        let mut chain = Vec::new();
        let mut current = Some(name);

        while let Some(name) = current {
            let prefab = self
                .get(name)
                .ok_or_else(|| SceneError::UnknownPrefab(name.to_string()))?;

            if chain.iter().any(|p: &&PrefabDef| p.name == prefab.name) {
                let mut cycle: Vec<String> = chain.iter().map(|p| p.name.clone()).collect();
                cycle.push(prefab.name.clone());
                return Err(SceneError::PrefabCycle(cycle));
            }

            chain.push(prefab);
            current = prefab.extends.as_deref();
        }

        chain.reverse();
        Ok(chain)
    }

    /// Fully composed component literals of a prefab
    pub fn resolve(&self, name: &str, registry: &SchemaRegistry) -> Result<BTreeMap<String, Node>> {
        let mut components = BTreeMap::new();
        for prefab in self.chain(name)? {
            overlay(registry, &mut components, &prefab.components);
        }
        Ok(components)
    }

    /// Component literals of an entity: its prefab (if any) with the
    /// entity's own literals merged over it
    pub fn compose(&self, entity: &EntityDef, registry: &SchemaRegistry) -> Result<BTreeMap<String, Node>> {
        let mut components = match &entity.prefab {
            Some(prefab) => self.resolve(prefab, registry)?,
            None => BTreeMap::new(),
        };
        overlay(registry, &mut components, &entity.components);
        Ok(components)
    }
}

fn overlay(registry: &SchemaRegistry, base: &mut BTreeMap<String, Node>, overrides: &BTreeMap<String, Node>) {
    for (component, literal) in overrides {
        let merged = match base.remove(component) {
            Some(existing) => merge_component(registry, component, existing, literal.clone()),
            None => literal.clone(),
        };
        base.insert(component.clone(), merged);
    }
}
