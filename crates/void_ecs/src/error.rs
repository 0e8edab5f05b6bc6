//! Entity store errors

use thiserror::Error;
use void_core::EntityId;
use void_ir::FieldPath;

/// Errors raised by [`EntityStore`](crate::EntityStore) operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EcsError {
    #[error("entity {0} does not exist")]
    NoSuchEntity(EntityId),

    #[error("name '{name}' is already held by entity {holder}")]
    NameTaken { name: String, holder: EntityId },

    #[error("entity {entity} has no component '{component}'")]
    MissingComponent { entity: EntityId, component: String },

    #[error("component '{component}' has no field at {path}")]
    NoSuchField { component: String, path: FieldPath },

    #[error("{component}.{path} is {found}, not an entity reference")]
    NotAnEntityRef {
        component: String,
        path: FieldPath,
        found: &'static str,
    },
}

/// Result type for entity store operations
pub type Result<T> = std::result::Result<T, EcsError>;
