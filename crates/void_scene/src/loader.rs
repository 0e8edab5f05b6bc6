//! Scene loader
//!
//! Loading is split in two halves so the pure part can run without holding
//! any lock on the entity store:
//!
//! 1. [`SceneLoader::prepare`]: compose prefabs, decode every component and
//!    collect its entity references, including those supplied by schema
//!    defaults. Touches no entity.
//! 2. [`SceneLoader::instantiate`]: create entities tagged with the scene
//!    name, attach components and link references. On any failure every entity created for the scene is
//!    despawned again, so a scene is either fully present or not at all.

use crate::config::SceneLoaderConfig;
use crate::definition::SceneDefinition;
use crate::error::{ComponentError, Result, SceneError};
use crate::prefab::PrefabLibrary;
use crate::state::SceneState;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use void_core::{EntityId, EntityPlaceholder};
use void_decode::{link, Decoder, NameTable, ReferenceTarget, UnresolvedReference};
use void_ecs::EntityStore;
use void_ir::{Node, Value};
use void_schema::SchemaRegistry;

/// A decoded scene that has not touched the entity store yet
#[derive(Debug, Clone)]
pub struct PreparedScene {
    name: String,
    entities: Vec<PreparedEntity>,
    references: Vec<UnresolvedReference>,
}

#[derive(Debug, Clone)]
struct PreparedEntity {
    name: Option<String>,
    components: Vec<(String, Value)>,
}

impl PreparedScene {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// References awaiting the link pass
    pub fn references(&self) -> &[UnresolvedReference] {
        &self.references
    }

    /// Decoded component of the entity at `slot`
    pub fn component(&self, slot: usize, component: &str) -> Option<&Value> {
        self.entities
            .get(slot)?
            .components
            .iter()
            .find(|(name, _)| name == component)
            .map(|(_, value)| value)
    }
}

/// A fully loaded scene
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedScene {
    pub name: String,
    /// Entity IDs in definition order
    pub entities: Vec<EntityId>,
    /// Named entities of the scene
    pub names: HashMap<String, EntityId>,
}

impl LoadedScene {
    /// Entity of this scene carrying `name`
    pub fn entity(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Drives one scene at a time through the load state machine
pub struct SceneLoader<'a> {
    registry: &'a SchemaRegistry,
    prefabs: &'a PrefabLibrary,
    config: SceneLoaderConfig,
    state: SceneState,
    scene: String,
}

impl<'a> SceneLoader<'a> {
    pub fn new(registry: &'a SchemaRegistry, prefabs: &'a PrefabLibrary) -> Self {
        Self::with_config(registry, prefabs, SceneLoaderConfig::default())
    }

    pub fn with_config(registry: &'a SchemaRegistry, prefabs: &'a PrefabLibrary, config: SceneLoaderConfig) -> Self {
        Self {
            registry,
            prefabs,
            config,
            state: SceneState::Parsing,
            scene: String::new(),
        }
    }

    /// State of the most recent load
    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn config(&self) -> &SceneLoaderConfig {
        &self.config
    }

    /// Prepare and instantiate in one go
    pub fn load<S: EntityStore>(&mut self, definition: &SceneDefinition, store: &mut S) -> Result<LoadedScene> {
        let prepared = self.prepare(definition)?;
        self.instantiate(prepared, store)
    }

    /// Compose prefabs and decode every component of the scene
    pub fn prepare(&mut self, definition: &SceneDefinition) -> Result<PreparedScene> {
        self.scene = definition.name.clone();
        self.state = SceneState::Parsing;
        log::debug!("Scene '{}': parsing", self.scene);

        let composed = match self.compose(definition) {
            Ok(composed) => composed,
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(SceneState::Decoding);
        self.decode(definition, composed).map_err(|e| self.fail(e))
    }

    /// Create the scene's entities in `store` and link their references
    pub fn instantiate<S: EntityStore>(&mut self, prepared: PreparedScene, store: &mut S) -> Result<LoadedScene> {
        self.scene = prepared.name.clone();
        self.state = SceneState::Decoding;

        let mut created = Vec::with_capacity(prepared.entities.len());
        match self.build(prepared, store, &mut created) {
            Ok(scene) => {
                self.transition(SceneState::Ready);
                log::info!("Scene '{}' ready with {} entities", scene.name, scene.len());
                Ok(scene)
            }
            Err(e) => {
                for &entity in created.iter().rev() {
                    store.despawn(entity);
                }
                log::error!("Rolled back {} entities of scene '{}'", created.len(), self.scene);
                Err(self.fail(e))
            }
        }
    }

    fn compose(&self, definition: &SceneDefinition) -> Result<Vec<BTreeMap<String, Node>>> {
        let prefabs = if definition.prefabs.is_empty() {
            Cow::Borrowed(self.prefabs)
        } else {
            let mut library = self.prefabs.clone();
            for prefab in &definition.prefabs {
                library.register(prefab.clone())?;
            }
            Cow::Owned(library)
        };

        definition
            .entities
            .iter()
            .map(|entity| prefabs.compose(entity, self.registry))
            .collect()
    }

    fn decode(&self, definition: &SceneDefinition, composed: Vec<BTreeMap<String, Node>>) -> Result<PreparedScene> {
        let mut seen = HashSet::new();
        for name in definition.entities.iter().filter_map(|e| e.name.as_deref()) {
            if !seen.insert(name) {
                return Err(SceneError::DuplicateEntityName(name.to_string()));
            }
        }

        let decoder = Decoder::with_config(self.registry, self.config.decoder);
        let mut entities = Vec::with_capacity(composed.len());
        let mut references = Vec::new();
        let mut errors = Vec::new();

        'entities: for (slot, (entity, components)) in definition.entities.iter().zip(composed).enumerate() {
            let placeholder = EntityPlaceholder::new(slot as u32);
            let mut decoded = Vec::with_capacity(components.len());

            for (component, literal) in components {
                match decoder.decode_component(placeholder, &component, &literal) {
                    Ok(component_value) => {
                        references.extend(component_value.references);
                        decoded.push((component, component_value.value));
                    }
                    Err(error) => {
                        errors.push(ComponentError {
                            entity: entity.label(slot),
                            component,
                            error,
                        });
                        if !self.config.collect_all_errors {
                            break 'entities;
                        }
                    }
                }
            }

            entities.push(PreparedEntity {
                name: entity.name.clone(),
                components: decoded,
            });
        }

        if !errors.is_empty() {
            return Err(SceneError::Decode(errors));
        }

        log::debug!(
            "Scene '{}': decoded {} entities, {} references",
            definition.name,
            entities.len(),
            references.len()
        );
        Ok(PreparedScene {
            name: definition.name.clone(),
            entities,
            references,
        })
    }

    fn build<S: EntityStore>(
        &mut self,
        prepared: PreparedScene,
        store: &mut S,
        created: &mut Vec<EntityId>,
    ) -> Result<LoadedScene> {
        let mut table = NameTable::new();
        let mut names = HashMap::new();

        for (slot, entity) in prepared.entities.into_iter().enumerate() {
            let id = store.create_placeholder();
            created.push(id);
            table.bind(EntityPlaceholder::new(slot as u32), id);
            store.tag_scene(id, &prepared.name)?;

            if let Some(name) = entity.name {
                store.set_name(id, &name)?;
                table.insert_name(name.clone(), id);
                names.insert(name, id);
            }
            for (component, value) in entity.components {
                store.insert_component(id, &component, value)?;
            }
        }
        self.transition(SceneState::EntitiesInstantiated);

        if self.config.allow_external_references {
            for reference in &prepared.references {
                if let ReferenceTarget::Named(name) = &reference.target {
                    if let Some(id) = store.resolve_name(name).filter(|_| !table.contains_name(name)) {
                        table.insert_name(name.clone(), id);
                    }
                }
            }
        }

        self.transition(SceneState::Linking);
        link(&prepared.references, &table, |entity, component, path, value| {
            store.set_field(entity, component, path, value)
        })?;

        Ok(LoadedScene {
            name: prepared.name,
            entities: created.clone(),
            names,
        })
    }

    fn transition(&mut self, next: SceneState) {
        debug_assert!(self.state.can_transition_to(next), "{} -> {}", self.state, next);
        log::debug!("Scene '{}': {} -> {}", self.scene, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, error: SceneError) -> SceneError {
        log::error!("Scene '{}' failed while {}: {}", self.scene, self.state, error);
        self.transition(SceneState::Failed);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::EntityDef;
    use crate::prefab::PrefabDef;
    use void_decode::{DecodeErrorKind, LinkError};
    use void_ecs::World;
    use void_schema::{StructDescriptor, TypeDescriptor, UnionDescriptor};

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builder()
            .register(
                "Health",
                StructDescriptor::default()
                    .field("max", TypeDescriptor::int())
                    .field_with_default("regen", TypeDescriptor::int(), 0),
            )
            .register(
                "Follow",
                StructDescriptor::default()
                    .field("target", TypeDescriptor::entity_ref())
                    .field_with_default("distance", TypeDescriptor::float(), 2.0),
            )
            .build()
            .unwrap()
    }

    fn follow(target: &str) -> Node {
        Node::record([("target", Node::record([("ref", Node::record([("entity", target)]))]))])
    }

    fn health(max: i64) -> Node {
        Node::record([("max", max)])
    }

    #[test]
    fn test_load_links_references() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);
        let mut world = World::new();

        let scene = SceneDefinition::new("level1")
            .with_entity(EntityDef::named("player").with_component("Follow", follow("door")))
            .with_entity(EntityDef::named("door").with_component("Health", health(5)));

        let loaded = loader.load(&scene, &mut world).unwrap();
        assert_eq!(loader.state(), SceneState::Ready);

        let player = loaded.entity("player").unwrap();
        let door = loaded.entity("door").unwrap();
        let target = world
            .component(player, "Follow")
            .and_then(|c| c.get("target"))
            .and_then(Value::as_entity);
        assert_eq!(target, Some(door));
        assert_eq!(world.component(door, "Health").and_then(|h| h.get("regen")), Some(&Value::Int(0)));
    }

    #[test]
    fn test_prepare_touches_nothing() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);

        let scene = SceneDefinition::new("s")
            .with_entity(EntityDef::new().with_component("Health", health(3)))
            .with_entity(EntityDef::named("b").with_component("Follow", follow("b")));

        let prepared = loader.prepare(&scene).unwrap();
        assert_eq!(loader.state(), SceneState::Decoding);
        assert_eq!(prepared.entity_count(), 2);
        assert_eq!(prepared.references().len(), 1);
        assert_eq!(prepared.references()[0].owner, EntityPlaceholder::new(1));
        assert_eq!(
            prepared.component(0, "Health").and_then(|h| h.get("max")),
            Some(&Value::Int(3))
        );
    }

    #[test]
    fn test_decode_errors_collected() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);
        let mut world = World::new();

        let scene = SceneDefinition::new("broken")
            .with_entity(EntityDef::named("a").with_component("Health", Node::empty_record()))
            .with_entity(EntityDef::new().with_component("Health", Node::record([("max", "lots")])))
            .with_entity(EntityDef::named("c").with_component("Shield", health(1)));

        let err = loader.load(&scene, &mut world).unwrap_err();
        assert_eq!(loader.state(), SceneState::Failed);
        assert!(world.is_empty());

        let errors = match err {
            SceneError::Decode(errors) => errors,
            other => panic!("expected decode errors, got {}", other),
        };
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0].error.kind, DecodeErrorKind::MissingField { .. }));
        assert_eq!((errors[1].entity.as_str(), errors[1].error.path.to_string().as_str()), ("#1", "max"));
        assert!(matches!(errors[2].error.kind, DecodeErrorKind::UnknownType { .. }));
    }

    #[test]
    fn test_first_error_only() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let config = SceneLoaderConfig::default().with_collect_all_errors(false);
        let mut loader = SceneLoader::with_config(&registry, &prefabs, config);

        let scene = SceneDefinition::new("broken")
            .with_entity(EntityDef::new().with_component("Health", Node::empty_record()))
            .with_entity(EntityDef::new().with_component("Health", Node::empty_record()));

        match loader.prepare(&scene) {
            Err(SceneError::Decode(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_entity_name() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);

        let scene = SceneDefinition::new("dupes")
            .with_entity(EntityDef::named("orc"))
            .with_entity(EntityDef::named("orc"));

        assert!(matches!(
            loader.prepare(&scene),
            Err(SceneError::DuplicateEntityName(name)) if name == "orc"
        ));
    }

    #[test]
    fn test_link_failure_rolls_back() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);
        let mut world = World::new();
        let bystander = world.spawn();

        let scene = SceneDefinition::new("level1")
            .with_entity(EntityDef::named("player").with_component("Follow", follow("chest")))
            .with_entity(EntityDef::named("door").with_component("Health", health(5)));

        let err = loader.load(&scene, &mut world).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Link(LinkError::UnresolvedReferenceTarget { ref name }) if name == "chest"
        ));
        assert_eq!(loader.state(), SceneState::Failed);
        assert_eq!(world.len(), 1);
        assert!(world.is_alive(bystander));
        assert!(world.resolve_name("player").is_none());
    }

    #[test]
    fn test_name_clash_with_world_rolls_back() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);
        let mut world = World::new();
        let existing = world.spawn();
        world.set_name(existing, "door").unwrap();

        let scene = SceneDefinition::new("level2")
            .with_entity(EntityDef::named("key"))
            .with_entity(EntityDef::named("door"));

        assert!(matches!(loader.load(&scene, &mut world), Err(SceneError::Store(_))));
        assert_eq!(world.len(), 1);
        assert_eq!(world.resolve_name("door"), Some(existing));
    }

    #[test]
    fn test_external_references() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut world = World::new();
        let door = world.spawn();
        world.set_name(door, "door").unwrap();

        let scene = SceneDefinition::new("guards")
            .with_entity(EntityDef::named("guard").with_component("Follow", follow("door")));

        let mut scoped = SceneLoader::new(&registry, &prefabs);
        assert!(matches!(scoped.load(&scene, &mut world), Err(SceneError::Link(_))));

        let config = SceneLoaderConfig::default().with_external_references(true);
        let mut open = SceneLoader::with_config(&registry, &prefabs, config);
        let loaded = open.load(&scene, &mut world).unwrap();

        let guard = loaded.entity("guard").unwrap();
        let target = world
            .component(guard, "Follow")
            .and_then(|c| c.get("target"))
            .and_then(Value::as_entity);
        assert_eq!(target, Some(door));
    }

    #[test]
    fn test_scene_local_prefabs() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);
        let mut world = World::new();

        let scene = SceneDefinition::new("arena")
            .with_prefab(PrefabDef::new("grunt").with_component("Health", Node::record([("max", 10), ("regen", 1)])))
            .with_entity(EntityDef::named("g1").with_prefab("grunt"))
            .with_entity(
                EntityDef::named("g2")
                    .with_prefab("grunt")
                    .with_component("Health", health(40)),
            );

        let loaded = loader.load(&scene, &mut world).unwrap();
        let g2 = world.component(loaded.entity("g2").unwrap(), "Health").unwrap();
        assert_eq!(g2.get("max"), Some(&Value::Int(40)));
        assert_eq!(g2.get("regen"), Some(&Value::Int(1)));
        assert!(prefabs.is_empty());
    }

    #[test]
    fn test_default_reference_is_linked() {
        let registry = SchemaRegistry::builder()
            .register(
                "Owner",
                StructDescriptor::default().field_with_default(
                    "owner",
                    TypeDescriptor::entity_ref(),
                    Node::record([("ref", Node::tag("self"))]),
                ),
            )
            .build()
            .unwrap();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);
        let mut world = World::new();

        let scene = SceneDefinition::new("owned")
            .with_entity(EntityDef::named("chest").with_component("Owner", Node::empty_record()));

        let loaded = loader.load(&scene, &mut world).unwrap();
        let chest = loaded.entity("chest").unwrap();
        let owner = world.component(chest, "Owner").and_then(|c| c.get("owner"));
        assert_eq!(owner, Some(&Value::EntityRef(Some(chest))));
    }

    #[test]
    fn test_structural_variant_named_like_its_field() {
        let registry = SchemaRegistry::builder()
            .register(
                "Aim",
                UnionDescriptor::default()
                    .variant(
                        "target",
                        StructDescriptor::new("Target")
                            .field("target", TypeDescriptor::entity_ref())
                            .field("speed", TypeDescriptor::float()),
                    )
                    .void_variant("idle"),
            )
            .build()
            .unwrap();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);
        let mut world = World::new();

        let aim = Node::record([("target", Node::record([("ref", Node::tag("self"))])), ("speed", Node::from(1))]);
        let scene = SceneDefinition::new("turrets")
            .with_entity(EntityDef::named("turret").with_component("Aim", aim));

        let loaded = loader.load(&scene, &mut world).unwrap();
        let turret = loaded.entity("turret").unwrap();
        let target = world
            .component(turret, "Aim")
            .and_then(Value::as_union)
            .and_then(|u| u.payload.get("target"))
            .and_then(Value::as_entity);
        assert_eq!(target, Some(turret));
    }

    /// Store that refuses to tag a second entity
    struct TagOnce {
        world: World,
        tagged: usize,
    }

    impl EntityStore for TagOnce {
        fn create_placeholder(&mut self) -> EntityId {
            self.world.create_placeholder()
        }
        fn resolve_name(&self, name: &str) -> Option<EntityId> {
            self.world.resolve_name(name)
        }
        fn set_name(&mut self, entity: EntityId, name: &str) -> void_ecs::Result<()> {
            self.world.set_name(entity, name)
        }
        fn insert_component(
            &mut self,
            entity: EntityId,
            component: &str,
            value: Value,
        ) -> void_ecs::Result<Option<Value>> {
            self.world.insert_component(entity, component, value)
        }
        fn set_field(
            &mut self,
            entity: EntityId,
            component: &str,
            path: &void_ir::FieldPath,
            value: Value,
        ) -> void_ecs::Result<()> {
            self.world.set_field(entity, component, path, value)
        }
        fn tag_scene(&mut self, entity: EntityId, scene: &str) -> void_ecs::Result<()> {
            if self.tagged == 1 {
                return Err(void_ecs::EcsError::NoSuchEntity(entity));
            }
            self.tagged += 1;
            self.world.tag_scene(entity, scene)
        }
        fn despawn(&mut self, entity: EntityId) -> bool {
            self.world.despawn(entity)
        }
        fn is_alive(&self, entity: EntityId) -> bool {
            self.world.is_alive(entity)
        }
    }

    #[test]
    fn test_entities_are_tagged_with_scene() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);
        let mut world = World::new();

        let scene = SceneDefinition::new("level1")
            .with_entity(EntityDef::named("door").with_component("Health", health(5)))
            .with_entity(EntityDef::new());

        let loaded = loader.load(&scene, &mut world).unwrap();
        assert!(loaded.entities.iter().all(|&e| world.scene_of(e) == Some("level1")));
    }

    #[test]
    fn test_tag_failure_rolls_back() {
        let registry = registry();
        let prefabs = PrefabLibrary::new();
        let mut loader = SceneLoader::new(&registry, &prefabs);
        let mut store = TagOnce {
            world: World::new(),
            tagged: 0,
        };

        let scene = SceneDefinition::new("level1")
            .with_entity(EntityDef::named("player"))
            .with_entity(EntityDef::named("door"));

        assert!(matches!(loader.load(&scene, &mut store), Err(SceneError::Store(_))));
        assert_eq!(loader.state(), SceneState::Failed);
        assert!(store.world.is_empty());
        assert!(store.world.resolve_name("player").is_none());
    }
}
