//! # void_ecs - Entity storage for loaded scenes
//!
//! A small in-memory entity store:
//! - Generational entity IDs for use-after-free safety
//! - Unique entity names, used to resolve scene references
//! - Decoded components keyed by component type name
//! - Scene ownership tags so a scene can be unloaded as a unit
//!
//! ## Example
//!
//! ```ignore
//! use void_ecs::prelude::*;
//!
//! let mut world = World::new();
//! let door = world.create_placeholder();
//! world.set_name(door, "door")?;
//! world.insert_component(door, "Health", Value::Int(10))?;
//! ```

pub mod entity;
pub mod error;
pub mod store;
pub mod world;

pub use entity::EntityAllocator;
pub use error::{EcsError, Result};
pub use store::EntityStore;
pub use world::World;

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::entity::EntityAllocator;
    pub use crate::error::EcsError;
    pub use crate::store::EntityStore;
    pub use crate::world::World;
    pub use void_core::EntityId;
    pub use void_ir::{FieldPath, Value};
}
