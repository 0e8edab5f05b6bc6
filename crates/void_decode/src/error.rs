//! Error types for decoding and linking

use std::fmt;
use thiserror::Error;
use void_core::{EntityId, EntityPlaceholder};
use void_ir::{FieldPath, FieldStep, Node};

/// What went wrong while decoding a node
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeErrorKind {
    /// Required field absent and no default declared
    #[error("missing required field '{field}' in struct '{structure}'")]
    MissingField { structure: String, field: String },

    /// Literal supplies a field the schema does not declare
    #[error("unknown field '{field}' for struct '{structure}'")]
    UnknownField { structure: String, field: String },

    /// Fixed-size array length mismatch
    #[error("expected exactly {expected} elements, got {got}")]
    ArraySizeMismatch { expected: usize, got: usize },

    /// Scalar or shape mismatch
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Bare tag names a variant that carries data
    #[error("variant '{variant}' carries data and cannot be written as a bare tag")]
    VoidVariantExpected { variant: String },

    /// No variant could be selected
    #[error("no union variant matches; available: {}", .available.join(", "))]
    UnresolvedUnionVariant { available: Vec<String> },

    /// A `named` descriptor has no registry entry
    #[error("unknown type '{name}'")]
    UnknownType { name: String },

    /// Malformed `ref` marker
    #[error("invalid entity reference: {reason}")]
    InvalidReferenceSyntax { reason: String },
}

impl DecodeErrorKind {
    /// Shape mismatch against an expected descriptor kind
    pub fn mismatch(expected: impl Into<String>, node: &Node) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: describe(node),
        }
    }
}

/// A decode failure and the field path at which it occurred
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {path}")]
pub struct DecodeError {
    /// Path from the decode root to the offending node
    pub path: FieldPath,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self {
            path: FieldPath::root(),
            kind,
        }
    }

    /// Record that this error happened below `step`
    pub fn within(mut self, step: impl Into<FieldStep>) -> Self {
        self.path.prepend(step.into());
        self
    }

    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for decoding
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Relaxed-mode diagnostic: several variants matched a record structurally.
///
/// Never an error; the first candidate in declaration order is used.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbiguousUnionVariant {
    pub union: String,
    pub chosen: String,
    pub candidates: Vec<String>,
}

impl fmt::Display for AmbiguousUnionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ambiguous literal for union '{}': variants [{}] all match, using '{}'",
            self.union,
            self.candidates.join(", "),
            self.chosen
        )
    }
}

/// Errors raised by the link pass
#[derive(Debug, Error)]
pub enum LinkError {
    /// A named reference matches no entity in the scene
    #[error("entity reference target '{name}' does not exist in the scene")]
    UnresolvedReferenceTarget { name: String },

    /// No live entity was bound to the reference's owner
    #[error("no entity instantiated for placeholder {0}")]
    UnknownOwner(EntityPlaceholder),

    /// The entity store refused the patch
    #[error("failed to set {component}.{path} on entity {entity}: {source}")]
    Setter {
        entity: EntityId,
        component: String,
        path: FieldPath,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Compact description of a node for diagnostics
pub(crate) fn describe(node: &Node) -> String {
    match node {
        Node::Record(fields) => format!("record with {} field(s)", fields.len()),
        Node::Tuple(elements) => format!("tuple of {} element(s)", elements.len()),
        Node::Null => "null".to_string(),
        other => format!("{} `{}`", other.kind_name(), other),
    }
}
