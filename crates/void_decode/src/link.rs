//! Entity reference linking
//!
//! Runs after every entity of a scene exists. Each [`UnresolvedReference`]
//! is resolved against a [`NameTable`] and written into the owning component
//! through a caller-supplied setter, which keeps this crate free of any
//! particular entity store.

use crate::error::LinkError;
use crate::reference::{ReferenceTarget, UnresolvedReference};
use std::collections::HashMap;
use void_core::{EntityId, EntityPlaceholder};
use void_ir::{FieldPath, Value};

/// Placeholder and name bindings of one scene instantiation
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    /// Indexed by placeholder slot
    owners: Vec<Option<EntityId>>,
    names: HashMap<String, EntityId>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the live entity created for `placeholder`
    pub fn bind(&mut self, placeholder: EntityPlaceholder, id: EntityId) {
        let slot = placeholder.slot();
        if self.owners.len() <= slot {
            self.owners.resize(slot + 1, None);
        }
        self.owners[slot] = Some(id);
    }

    /// Make `id` reachable by name. Returns the previous holder of the name.
    pub fn insert_name(&mut self, name: impl Into<String>, id: EntityId) -> Option<EntityId> {
        self.names.insert(name.into(), id)
    }

    /// Entity created for `placeholder`
    pub fn owner(&self, placeholder: EntityPlaceholder) -> Option<EntityId> {
        self.owners.get(placeholder.slot()).copied().flatten()
    }

    /// Entity carrying `name`
    pub fn resolve(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }
}

/// Resolve and apply every reference.
///
/// All targets are resolved before the first write, so a scene with a
/// dangling reference is never left partially patched. The first failure is
/// returned; every unresolved target is logged.
pub fn link<F, E>(refs: &[UnresolvedReference], table: &NameTable, mut setter: F) -> Result<(), LinkError>
where
    F: FnMut(EntityId, &str, &FieldPath, Value) -> Result<(), E>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut resolved = Vec::with_capacity(refs.len());
    let mut first_failure = None;

    for reference in refs {
        match resolve_one(reference, table) {
            Ok(pair) => resolved.push((reference, pair)),
            Err(err) => {
                log::error!(
                    "Unresolved reference in {}.{} of {}: {}",
                    reference.component,
                    reference.field_path,
                    reference.owner,
                    err
                );
                first_failure.get_or_insert(err);
            }
        }
    }

    if let Some(err) = first_failure {
        return Err(err);
    }

    for (reference, (owner, target)) in resolved {
        log::trace!(
            "Linking {}.{} of {} to {}",
            reference.component,
            reference.field_path,
            owner,
            target
        );
        setter(
            owner,
            &reference.component,
            &reference.field_path,
            Value::EntityRef(Some(target)),
        )
        .map_err(|e| LinkError::Setter {
            entity: owner,
            component: reference.component.clone(),
            path: reference.field_path.clone(),
            source: e.into(),
        })?;
    }

    log::debug!("Linked {} entity reference(s)", refs.len());
    Ok(())
}

fn resolve_one(reference: &UnresolvedReference, table: &NameTable) -> Result<(EntityId, EntityId), LinkError> {
    let owner = table
        .owner(reference.owner)
        .ok_or(LinkError::UnknownOwner(reference.owner))?;

    let target = match &reference.target {
        ReferenceTarget::SelfEntity => owner,
        ReferenceTarget::Named(name) => table
            .resolve(name)
            .ok_or_else(|| LinkError::UnresolvedReferenceTarget { name: name.clone() })?,
    };
    Ok((owner, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("field is read-only")]
    struct ReadOnly;

    fn reference(owner: u32, component: &str, path: &[&str], target: ReferenceTarget) -> UnresolvedReference {
        UnresolvedReference {
            owner: EntityPlaceholder::new(owner),
            component: component.to_string(),
            field_path: FieldPath::from_steps(path.iter().copied()),
            target,
        }
    }

    fn table() -> NameTable {
        let mut table = NameTable::new();
        table.bind(EntityPlaceholder::new(0), EntityId::new(10, 0));
        table.bind(EntityPlaceholder::new(1), EntityId::new(11, 0));
        table.insert_name("player", EntityId::new(10, 0));
        table.insert_name("door", EntityId::new(11, 0));
        table
    }

    #[test]
    fn test_name_table() {
        let table = table();
        assert_eq!(table.owner(EntityPlaceholder::new(1)), Some(EntityId::new(11, 0)));
        assert_eq!(table.owner(EntityPlaceholder::new(5)), None);
        assert_eq!(table.resolve("door"), Some(EntityId::new(11, 0)));
        assert!(table.resolve("chest").is_none());
    }

    #[test]
    fn test_link_self_and_named() {
        let refs = vec![
            reference(0, "Follow", &["target"], ReferenceTarget::Named("door".into())),
            reference(1, "Anchor", &["owner"], ReferenceTarget::SelfEntity),
        ];

        let mut writes = Vec::new();
        link(&refs, &table(), |entity, component, path, value| {
            writes.push((entity, component.to_string(), path.to_string(), value));
            Ok::<_, ReadOnly>(())
        })
        .unwrap();

        assert_eq!(
            writes,
            vec![
                (
                    EntityId::new(10, 0),
                    "Follow".to_string(),
                    "target".to_string(),
                    Value::EntityRef(Some(EntityId::new(11, 0)))
                ),
                (
                    EntityId::new(11, 0),
                    "Anchor".to_string(),
                    "owner".to_string(),
                    Value::EntityRef(Some(EntityId::new(11, 0)))
                ),
            ]
        );
    }

    #[test]
    fn test_unresolved_target_writes_nothing() {
        let refs = vec![
            reference(0, "Follow", &["target"], ReferenceTarget::Named("door".into())),
            reference(1, "Key", &["opens"], ReferenceTarget::Named("chest".into())),
        ];

        let mut writes = 0;
        let err = link(&refs, &table(), |_, _, _, _| {
            writes += 1;
            Ok::<_, ReadOnly>(())
        })
        .unwrap_err();

        assert!(matches!(err, LinkError::UnresolvedReferenceTarget { ref name } if name == "chest"));
        assert_eq!(writes, 0);
    }

    #[test]
    fn test_unknown_owner() {
        let refs = vec![reference(7, "Follow", &["target"], ReferenceTarget::SelfEntity)];
        let err = link(&refs, &table(), |_, _, _, _| Ok::<_, ReadOnly>(())).unwrap_err();
        assert!(matches!(err, LinkError::UnknownOwner(p) if p == EntityPlaceholder::new(7)));
    }

    #[test]
    fn test_setter_failure() {
        let refs = vec![reference(0, "Follow", &["target"], ReferenceTarget::SelfEntity)];
        let err = link(&refs, &table(), |_, _, _, _| Err(ReadOnly)).unwrap_err();

        match err {
            LinkError::Setter { entity, component, path, source } => {
                assert_eq!(entity, EntityId::new(10, 0));
                assert_eq!(component, "Follow");
                assert_eq!(path.to_string(), "target");
                assert_eq!(source.to_string(), "field is read-only");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
