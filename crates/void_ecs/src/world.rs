//! World - Container for all entity data
//!
//! Entities carry an optional unique name, the scene that created them, and
//! their decoded components keyed by component type name.

use crate::entity::EntityAllocator;
use crate::error::{EcsError, Result};
use crate::store::EntityStore;
use std::collections::{BTreeMap, HashMap};
use void_core::EntityId;
use void_ir::{FieldPath, Value};

/// Per-entity data
#[derive(Debug, Default)]
struct EntityRecord {
    name: Option<String>,
    scene: Option<String>,
    components: BTreeMap<String, Value>,
}

/// The world - container for all entities and their components
#[derive(Debug, Default)]
pub struct World {
    /// Entity allocator
    entities: EntityAllocator,
    /// Entity data by ID
    records: HashMap<EntityId, EntityRecord>,
    /// Unique names
    names: HashMap<String, EntityId>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an entity with no components
    pub fn spawn(&mut self) -> EntityId {
        let entity = self.entities.allocate();
        self.records.insert(entity, EntityRecord::default());
        entity
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.alive_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over live entities (unordered)
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.records.keys().copied()
    }

    pub fn name_of(&self, entity: EntityId) -> Option<&str> {
        self.records.get(&entity)?.name.as_deref()
    }

    /// Get a component of an entity
    pub fn component(&self, entity: EntityId, component: &str) -> Option<&Value> {
        self.records.get(&entity)?.components.get(component)
    }

    /// Get a component of an entity mutably
    pub fn component_mut(&mut self, entity: EntityId, component: &str) -> Option<&mut Value> {
        self.records.get_mut(&entity)?.components.get_mut(component)
    }

    /// All components of an entity, in name order
    pub fn components(&self, entity: EntityId) -> impl Iterator<Item = (&str, &Value)> {
        self.records
            .get(&entity)
            .into_iter()
            .flat_map(|record| record.components.iter().map(|(name, value)| (name.as_str(), value)))
    }

    /// Remove a component, returning its value
    pub fn remove_component(&mut self, entity: EntityId, component: &str) -> Option<Value> {
        self.records.get_mut(&entity)?.components.remove(component)
    }

    pub fn scene_of(&self, entity: EntityId) -> Option<&str> {
        self.records.get(&entity)?.scene.as_deref()
    }

    /// Entities owned by `scene`
    pub fn scene_entities(&self, scene: &str) -> Vec<EntityId> {
        self.records
            .iter()
            .filter(|(_, record)| record.scene.as_deref() == Some(scene))
            .map(|(&entity, _)| entity)
            .collect()
    }

    /// Despawn every entity owned by `scene`. Returns how many were removed.
    pub fn despawn_scene(&mut self, scene: &str) -> usize {
        let doomed = self.scene_entities(scene);
        let count = doomed.into_iter().filter(|&entity| self.despawn(entity)).count();
        log::debug!("Despawned {} entities of scene '{}'", count, scene);
        count
    }

    /// Remove all entities
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl EntityStore for World {
    fn create_placeholder(&mut self) -> EntityId {
        self.spawn()
    }

    fn resolve_name(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    fn set_name(&mut self, entity: EntityId, name: &str) -> Result<()> {
        if let Some(&holder) = self.names.get(name) {
            if holder != entity {
                return Err(EcsError::NameTaken {
                    name: name.to_string(),
                    holder,
                });
            }
        }

        let record = self.records.get_mut(&entity).ok_or(EcsError::NoSuchEntity(entity))?;
        if let Some(previous) = record.name.replace(name.to_string()) {
            self.names.remove(&previous);
        }
        self.names.insert(name.to_string(), entity);
        Ok(())
    }

    fn insert_component(&mut self, entity: EntityId, component: &str, value: Value) -> Result<Option<Value>> {
        let record = self.records.get_mut(&entity).ok_or(EcsError::NoSuchEntity(entity))?;
        Ok(record.components.insert(component.to_string(), value))
    }

    fn set_field(&mut self, entity: EntityId, component: &str, path: &FieldPath, value: Value) -> Result<()> {
        let record = self.records.get_mut(&entity).ok_or(EcsError::NoSuchEntity(entity))?;
        let root = record
            .components
            .get_mut(component)
            .ok_or_else(|| EcsError::MissingComponent {
                entity,
                component: component.to_string(),
            })?;

        let target = root.lookup_mut(path).ok_or_else(|| EcsError::NoSuchField {
            component: component.to_string(),
            path: path.clone(),
        })?;
        let found = target.kind_name();

        match (target.entity_slot_mut(), value) {
            (Some(slot), Value::EntityRef(id)) => {
                *slot = id;
                Ok(())
            }
            (Some(_), other) => Err(EcsError::NotAnEntityRef {
                component: component.to_string(),
                path: path.clone(),
                found: other.kind_name(),
            }),
            (None, _) => Err(EcsError::NotAnEntityRef {
                component: component.to_string(),
                path: path.clone(),
                found,
            }),
        }
    }

    fn tag_scene(&mut self, entity: EntityId, scene: &str) -> Result<()> {
        let record = self.records.get_mut(&entity).ok_or(EcsError::NoSuchEntity(entity))?;
        record.scene = Some(scene.to_string());
        Ok(())
    }

    fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        if let Some(record) = self.records.remove(&entity) {
            if let Some(name) = record.name {
                self.names.remove(&name);
            }
        }
        true
    }

    fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.is_alive(entity)
    }
}
