//! # void_scene - Scene and prefab loading
//!
//! Turns scene definitions into live entities:
//!
//! ```text
//! SceneDefinition ──► prefabs composed ──► components decoded ──► entities created ──► references linked
//!    (Parsing)                              (Decoding)          (EntitiesInstantiated)     (Linking) ──► Ready
//! ```
//!
//! Any failure moves the load to `Failed` and removes whatever the load had
//! already created. Scenes are loaded fully or not at all.
//!
//! ## Example
//!
//! ```ignore
//! use void_scene::prelude::*;
//!
//! let registry = Arc::new(SchemaRegistry::from_toml_str(&catalogue)?);
//! let mut scenes = SceneManager::new(registry);
//! let level = scenes.load_file("scenes/level1.toml")?;
//! let player = level.entity("player");
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod loader;
pub mod manager;
pub mod prefab;
pub mod state;

pub use config::SceneLoaderConfig;
pub use definition::{EntityDef, SceneDefinition};
pub use error::{ComponentError, Result, SceneError};
pub use loader::{LoadedScene, PreparedScene, SceneLoader};
pub use manager::SceneManager;
pub use prefab::{PrefabDef, PrefabLibrary};
pub use state::SceneState;

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::{
        EntityDef, LoadedScene, PrefabDef, PrefabLibrary, SceneDefinition, SceneError, SceneLoader,
        SceneLoaderConfig, SceneManager, SceneState,
    };
    pub use std::sync::Arc;
    pub use void_ecs::{EntityStore, World};
    pub use void_schema::SchemaRegistry;
}
