//! # void_core - Void Engine Core
//!
//! Zero-dependency primitives shared by every crate of the scene pipeline.
//! The value tree, the decoded values, the entity store and the scene loader
//! all agree on one entity identifier type, defined here so that none of them
//! has to depend on another just to name an entity.

pub mod id;

pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{EntityId, EntityPlaceholder};
}
