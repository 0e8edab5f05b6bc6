//! The entity store seam used by scene loading
//!
//! Scene loading only needs a handful of operations from whatever holds the
//! game's entities. [`World`](crate::World) is the in-memory implementation.

use crate::error::Result;
use void_core::EntityId;
use void_ir::{FieldPath, Value};

/// Entity storage consumed by the scene loader and the link pass
pub trait EntityStore {
    /// Create an entity with no components
    fn create_placeholder(&mut self) -> EntityId;

    /// Look up a live entity by its unique name
    fn resolve_name(&self, name: &str) -> Option<EntityId>;

    /// Give `entity` a unique name
    fn set_name(&mut self, entity: EntityId, name: &str) -> Result<()>;

    /// Attach (or replace) a decoded component, returning the previous value
    fn insert_component(&mut self, entity: EntityId, component: &str, value: Value) -> Result<Option<Value>>;

    /// Patch the entity reference at `path` inside a component
    fn set_field(&mut self, entity: EntityId, component: &str, path: &FieldPath, value: Value) -> Result<()>;

    /// Record that `entity` belongs to the scene `scene`
    fn tag_scene(&mut self, entity: EntityId, scene: &str) -> Result<()>;

    /// Remove an entity with its name and components
    fn despawn(&mut self, entity: EntityId) -> bool;

    fn is_alive(&self, entity: EntityId) -> bool;
}
