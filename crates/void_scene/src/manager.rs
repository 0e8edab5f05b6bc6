//! Scene manager
//!
//! Owns the shared world and the set of loaded scenes. Decoding runs
//! without any lock; instantiation, linking and scene tagging run under a
//! single write guard, so a reader holding the world never sees a scene that
//! is not ready.

use crate::config::SceneLoaderConfig;
use crate::definition::SceneDefinition;
use crate::error::{Result, SceneError};
use crate::loader::{LoadedScene, SceneLoader};
use crate::prefab::{PrefabDef, PrefabLibrary};
use crate::state::SceneState;
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use void_ecs::World;
use void_schema::SchemaRegistry;

/// Loads and unloads scenes into a shared [`World`]
pub struct SceneManager {
    world: Arc<RwLock<World>>,
    registry: Arc<SchemaRegistry>,
    prefabs: PrefabLibrary,
    config: SceneLoaderConfig,
    scenes: HashMap<String, LoadedScene>,
}

impl SceneManager {
    /// Create a manager with an empty world
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self::with_world(registry, Arc::new(RwLock::new(World::new())))
    }

    /// Create a manager over an existing world
    pub fn with_world(registry: Arc<SchemaRegistry>, world: Arc<RwLock<World>>) -> Self {
        Self {
            world,
            registry,
            prefabs: PrefabLibrary::new(),
            config: SceneLoaderConfig::default(),
            scenes: HashMap::new(),
        }
    }

    pub fn with_config(mut self, config: SceneLoaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_prefabs(mut self, prefabs: PrefabLibrary) -> Self {
        self.prefabs = prefabs;
        self
    }

    /// Register a prefab shared by every scene loaded afterwards
    pub fn register_prefab(&mut self, prefab: PrefabDef) -> Result<()> {
        self.prefabs.register(prefab)
    }

    pub fn prefabs(&self) -> &PrefabLibrary {
        &self.prefabs
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Shared handle to the world
    pub fn world(&self) -> Arc<RwLock<World>> {
        Arc::clone(&self.world)
    }

    /// Read access to the world
    pub fn read(&self) -> RwLockReadGuard<'_, World> {
        self.world.read()
    }

    /// Load a scene. Scene names are unique among loaded scenes.
    pub fn load(&mut self, definition: &SceneDefinition) -> Result<&LoadedScene> {
        if self.scenes.contains_key(&definition.name) {
            return Err(SceneError::AlreadyLoaded(definition.name.clone()));
        }

        let mut loader = SceneLoader::with_config(&self.registry, &self.prefabs, self.config);
        let prepared = loader.prepare(definition)?;

        let loaded = loader.instantiate(prepared, &mut *self.world.write())?;

        Ok(self.scenes.entry(loaded.name.clone()).or_insert(loaded))
    }

    /// Parse a JSON scene and load it
    pub fn load_json(&mut self, source: &str) -> Result<&LoadedScene> {
        let definition = SceneDefinition::from_json_str(source)?;
        self.load(&definition)
    }

    /// Parse a TOML scene and load it
    pub fn load_toml(&mut self, source: &str) -> Result<&LoadedScene> {
        let definition = SceneDefinition::from_toml_str(source)?;
        self.load(&definition)
    }

    /// Read a scene file and load it
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&LoadedScene> {
        let definition = SceneDefinition::load(path)?;
        self.load(&definition)
    }

    /// Despawn every entity of a loaded scene. Returns how many were removed.
    pub fn unload(&mut self, name: &str) -> Result<usize> {
        if self.scenes.remove(name).is_none() {
            return Err(SceneError::NotLoaded(name.to_string()));
        }
        let removed = self.world.write().despawn_scene(name);
        log::info!("Unloaded scene '{}' ({} entities)", name, removed);
        Ok(removed)
    }

    pub fn scene(&self, name: &str) -> Option<&LoadedScene> {
        self.scenes.get(name)
    }

    /// Loaded scenes are always ready; anything else is unknown here
    pub fn state(&self, name: &str) -> Option<SceneState> {
        self.scenes.get(name).map(|_| SceneState::Ready)
    }

    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }
}
