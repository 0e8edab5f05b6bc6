//! Schema registry
//!
//! The registry maps user-facing type names (component names, prefab payload
//! types, shared structs) to descriptors. It is assembled once through
//! [`SchemaRegistryBuilder`], validated, and then never mutated again, so a
//! single instance can be shared across threads behind an `Arc` with no lock.

use crate::descriptor::TypeDescriptor;
use crate::error::{Result, SchemaError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Field name that introduces an entity reference marker in literals.
/// Structs may not declare it.
pub const REFERENCE_FIELD: &str = "ref";

/// Read-only catalogue of named type descriptors
pub struct SchemaRegistry {
    types: BTreeMap<String, TypeDescriptor>,
}

impl SchemaRegistry {
    /// Start assembling a registry
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// Build a registry from a TOML catalogue with one `[types.<Name>]`
    /// table per type
    pub fn from_toml_str(source: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Catalogue {
            #[serde(default)]
            types: BTreeMap<String, TypeDescriptor>,
        }

        let catalogue: Catalogue = toml::from_str(source)?;
        catalogue
            .types
            .into_iter()
            .fold(Self::builder(), |builder, (name, ty)| builder.register(name, ty))
            .build()
    }

    /// Look up a type by name
    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Follow `named` aliases until a structural descriptor is reached.
    ///
    /// Returns the unknown name on a miss. Registered aliases are acyclic, so
    /// this terminates.
    pub fn resolve<'a>(
        &'a self,
        mut descriptor: &'a TypeDescriptor,
    ) -> std::result::Result<&'a TypeDescriptor, &'a str> {
        while let TypeDescriptor::Named { name } = descriptor {
            descriptor = self.lookup(name).ok_or(name.as_str())?;
        }
        Ok(descriptor)
    }

    /// Iterate over all registered types in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("types", &self.types.len())
            .finish()
    }
}

/// Collects descriptors and validates them into a [`SchemaRegistry`]
#[derive(Default)]
pub struct SchemaRegistryBuilder {
    types: BTreeMap<String, TypeDescriptor>,
    duplicates: Vec<String>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under `name`. Anonymous struct/union descriptors take
    /// the registration name.
    pub fn register(mut self, name: impl Into<String>, descriptor: impl Into<TypeDescriptor>) -> Self {
        let name = name.into();
        let mut descriptor = descriptor.into();

        match &mut descriptor {
            TypeDescriptor::Struct(s) if s.name.is_empty() => s.name = name.clone(),
            TypeDescriptor::Union(u) if u.name.is_empty() => u.name = name.clone(),
            _ => {}
        }

        if self.types.contains_key(&name) {
            self.duplicates.push(name);
        } else {
            self.types.insert(name, descriptor);
        }
        self
    }

    /// Validate and freeze the registry
    pub fn build(self) -> Result<SchemaRegistry> {
        if let Some(name) = self.duplicates.into_iter().next() {
            return Err(SchemaError::AlreadyRegistered(name));
        }

        for (owner, ty) in &self.types {
            check_descriptor(owner, ty, &self.types)?;
        }

        for name in self.types.keys() {
            check_alias_chain(name, &self.types)?;
        }

        log::debug!("Schema registry built with {} types", self.types.len());
        Ok(SchemaRegistry { types: self.types })
    }
}

fn check_descriptor(
    owner: &str,
    ty: &TypeDescriptor,
    types: &BTreeMap<String, TypeDescriptor>,
) -> Result<()> {
    let mut failure = None;

    ty.walk(&mut |d| {
        if failure.is_some() {
            return;
        }
        failure = match d {
            TypeDescriptor::Named { name } if !types.contains_key(name) => {
                Some(SchemaError::NotRegistered {
                    owner: owner.to_string(),
                    name: name.clone(),
                })
            }
            TypeDescriptor::Struct(s) => {
                let mut seen = HashSet::new();
                if s.get(REFERENCE_FIELD).is_some() {
                    Some(SchemaError::ReservedField {
                        structure: s.name.clone(),
                        field: REFERENCE_FIELD.to_string(),
                    })
                } else {
                    s.fields
                        .iter()
                        .find(|f| !seen.insert(f.name.as_str()))
                        .map(|f| SchemaError::DuplicateField {
                            structure: s.name.clone(),
                            field: f.name.clone(),
                        })
                }
            }
            TypeDescriptor::Union(u) => {
                let mut seen = HashSet::new();
                u.variants
                    .iter()
                    .find(|v| !seen.insert(v.name.as_str()))
                    .map(|v| SchemaError::DuplicateVariant {
                        union: u.name.clone(),
                        variant: v.name.clone(),
                    })
            }
            _ => None,
        };
    });

    failure.map_or(Ok(()), Err)
}

/// Optionals do not consume a literal level (`null` aside), so a loop made
/// of aliases and optionals would never bottom out while decoding.
fn check_alias_chain(start: &str, types: &BTreeMap<String, TypeDescriptor>) -> Result<()> {
    let mut visited = HashSet::from([start]);
    let mut current = types.get(start);

    while let Some(descriptor) = current {
        current = match descriptor {
            TypeDescriptor::Optional { inner } => Some(inner.as_ref()),
            TypeDescriptor::Named { name } => {
                if !visited.insert(name.as_str()) {
                    return Err(SchemaError::AliasCycle(start.to_string()));
                }
                types.get(name)
            }
            _ => None,
        };
    }
    Ok(())
}
