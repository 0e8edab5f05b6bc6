//! Error types for schema construction

use thiserror::Error;

/// Errors raised while building a schema registry
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A type name was registered twice
    #[error("Type already registered: {0}")]
    AlreadyRegistered(String),

    /// A descriptor refers to a type name the registry does not know
    #[error("Type '{owner}' refers to unregistered type '{name}'")]
    NotRegistered { owner: String, name: String },

    /// Named aliases loop back onto themselves, possibly through optionals
    #[error("Type alias cycle through '{0}'")]
    AliasCycle(String),

    /// A struct declares the same field twice
    #[error("Duplicate field '{field}' in struct '{structure}'")]
    DuplicateField { structure: String, field: String },

    /// A struct declares a field name reserved for entity reference markers
    #[error("Struct '{structure}' declares reserved field '{field}'")]
    ReservedField { structure: String, field: String },

    /// A union declares the same variant twice
    #[error("Duplicate variant '{variant}' in union '{union}'")]
    DuplicateVariant { union: String, variant: String },

    /// The TOML catalogue could not be read
    #[error("Invalid schema catalogue: {0}")]
    Catalogue(#[from] toml::de::Error),
}

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
