//! # Void IR - Scene literal trees and decoded values
//!
//! Two representations of the same authoring data live here:
//!
//! ```text
//! scene/prefab literal ──► Node (untyped tree) ──► decode ──► Value (typed)
//! ```
//!
//! ## Key Concepts
//!
//! - **Node**: generic literal tree (records, tuples, scalars, tags, null).
//!   Produced per load, discarded after decoding.
//! - **Value**: typed result of decoding a node against a type descriptor.
//! - **FieldPath**: a route from a component root down to a nested node or
//!   value, shared by error reports and entity reference patching.

pub mod node;
pub mod path;
pub mod value;

pub use node::Node;
pub use path::{FieldPath, FieldStep};
pub use value::{StructValue, UnionValue, Value};
