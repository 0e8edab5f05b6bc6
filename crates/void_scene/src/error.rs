//! Scene loading errors

use std::fmt;
use thiserror::Error;
use void_decode::{DecodeError, LinkError};
use void_ecs::EcsError;
use void_schema::SchemaError;

/// A decode failure located within a scene
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentError {
    /// Entity name, or `#slot` for unnamed entities
    pub entity: String,
    pub component: String,
    pub error: DecodeError,
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.entity, self.component, self.error)
    }
}

/// Errors raised while loading a scene
#[derive(Debug, Error)]
pub enum SceneError {
    /// One or more components failed to decode; nothing was instantiated
    #[error("scene failed to decode: {}", summarize(.0))]
    Decode(Vec<ComponentError>),

    /// Reference linking failed; the scene's entities were rolled back
    #[error("scene failed to link: {0}")]
    Link(#[from] LinkError),

    /// The entity store rejected an operation; the scene's entities were rolled back
    #[error("entity store error: {0}")]
    Store(#[from] EcsError),

    #[error("entity name '{0}' is used more than once in the scene")]
    DuplicateEntityName(String),

    #[error("unknown prefab '{0}'")]
    UnknownPrefab(String),

    #[error("prefab '{0}' is already registered")]
    DuplicatePrefab(String),

    /// `extends` chain loops back on itself
    #[error("prefab inheritance cycle: {}", .0.join(" -> "))]
    PrefabCycle(Vec<String>),

    #[error("scene '{0}' is already loaded")]
    AlreadyLoaded(String),

    #[error("scene '{0}' is not loaded")]
    NotLoaded(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn summarize(errors: &[ComponentError]) -> String {
    match errors {
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
        [] => "no errors".to_string(),
    }
}

/// Result type for scene loading
pub type Result<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;
    use void_decode::DecodeErrorKind;
    use void_ir::FieldStep;

    fn missing(entity: &str) -> ComponentError {
        ComponentError {
            entity: entity.to_string(),
            component: "Health".to_string(),
            error: DecodeError::new(DecodeErrorKind::MissingField {
                structure: "Health".into(),
                field: "max".into(),
            })
            .within(FieldStep::from("inner")),
        }
    }

    #[test]
    fn test_decode_error_summary() {
        let one = SceneError::Decode(vec![missing("orc")]);
        assert!(one.to_string().starts_with("scene failed to decode: orc/Health: "));
        assert!(one.to_string().ends_with("at inner"));

        let many = SceneError::Decode(vec![missing("orc"), missing("#3"), missing("troll")]);
        assert!(many.to_string().ends_with("(and 2 more)"));
    }

    #[test]
    fn test_prefab_cycle_display() {
        let err = SceneError::PrefabCycle(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(err.to_string(), "prefab inheritance cycle: a -> b -> a");
    }
}
