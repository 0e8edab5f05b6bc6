//! # void_decode - Typed scene literal decoding
//!
//! Turns untyped literal trees into typed values, guided by a
//! [`SchemaRegistry`](void_schema::SchemaRegistry):
//!
//! ```text
//!                                          ┌──► Value ──────┐
//! Node (literal tree) ──► decode_component ┤                ├──► link ──► patched components
//!                                          └──► references ─┘
//! ```
//!
//! ## Key Concepts
//!
//! - **Decoder**: interprets a type descriptor over a node; pure, no I/O.
//! - **Union resolution**: bare tag, then `{variant: payload}` selector, then
//!   (relaxed mode only) first structurally compatible variant.
//! - **Merge**: prefab defaults composed with per-instance overrides.
//! - **References**: `{ref: self}` / `{ref: {entity: "name"}}` markers decode to
//!   empty entity references and are patched once the scene's entities exist.
//!   `extract_references` finds the same markers on a raw tree without a schema.

pub mod config;
pub mod decoder;
pub mod error;
pub mod link;
pub mod merge;
pub mod reference;
pub mod variant;

pub use config::{DecoderConfig, UnionMode};
pub use decoder::{DecodedComponent, Decoder};
pub use error::{AmbiguousUnionVariant, DecodeError, DecodeErrorKind, LinkError, Result};
pub use link::{link, NameTable};
pub use merge::{merge, merge_component, merge_nodes};
pub use reference::{extract_references, parse_marker, ReferenceTarget, UnresolvedReference};
