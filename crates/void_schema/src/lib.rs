//! # void_schema - Scene type schemas
//!
//! Describes the shapes scene and prefab literals decode into. Descriptors
//! are plain data: they can be assembled in code through the builder API or
//! read from a TOML catalogue, and are interpreted by the decoder at load
//! time instead of being generated per type at compile time.
//!
//! ## Example
//!
//! ```ignore
//! use void_schema::prelude::*;
//!
//! let registry = SchemaRegistry::builder()
//!     .register("Health", StructDescriptor::new("Health")
//!         .field("current", TypeDescriptor::float())
//!         .field_with_default("max", TypeDescriptor::float(), 100.0))
//!     .build()?;
//!
//! let health = registry.lookup("Health");
//! ```

pub mod descriptor;
pub mod error;
pub mod registry;

pub use descriptor::*;
pub use error::{Result, SchemaError};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder, REFERENCE_FIELD};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::descriptor::{
        FieldDescriptor, ScalarKind, StructDescriptor, TypeDescriptor, UnionDescriptor,
        VariantDescriptor,
    };
    pub use crate::error::SchemaError;
    pub use crate::registry::SchemaRegistry;
}
