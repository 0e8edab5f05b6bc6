//! Entity reference markers
//!
//! A reference is written as a record whose only field is `ref`:
//!
//! ```text
//! {ref: self}                  the owning entity
//! {ref: {entity: "door"}}      the scene entity named "door"
//! ```
//!
//! Formats without bare tags spell the first form like any other void
//! variant: `{"ref": {"self": null}}`, or `ref = { self = {} }` in TOML.
//!
//! Markers are structural, so [`extract_references`] finds them on a literal
//! tree without any schema; its paths are literal paths. The decoder turns
//! each marker into an empty entity reference and reports it with a path
//! into the decoded value (see [`Decoder::decode_component`]), which is what
//! the link pass patches.
//!
//! Since a sole `ref` field always reads as a marker, `ref` is reserved and
//! cannot be declared as a struct field.
//!
//! [`Decoder::decode_component`]: crate::Decoder::decode_component

use crate::error::{DecodeError, DecodeErrorKind, Result};
use std::fmt;
use void_core::EntityPlaceholder;
use void_ir::{FieldPath, FieldStep, Node};

/// Field name introducing a reference marker
pub const REF_FIELD: &str = void_schema::REFERENCE_FIELD;
/// Tag naming the owning entity
pub const SELF_TAG: &str = "self";
/// Field naming a target entity
pub const ENTITY_FIELD: &str = "entity";

/// What a reference points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    /// The entity owning the component
    SelfEntity,
    /// A scene entity, by name
    Named(String),
}

impl fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfEntity => write!(f, "self"),
            Self::Named(name) => write!(f, "\"{}\"", name),
        }
    }
}

/// A reference awaiting the link pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Entity definition owning the component
    pub owner: EntityPlaceholder,
    /// Component holding the reference
    pub component: String,
    /// Path from the component root to the reference
    pub field_path: FieldPath,
    pub target: ReferenceTarget,
}

/// Interpret `node` as a reference marker.
///
/// `Ok(None)` when the node is not marker-shaped at all; an error when it is
/// a sole-`ref` record with a malformed payload.
pub fn parse_marker(node: &Node) -> Result<Option<ReferenceTarget>> {
    let Some((REF_FIELD, payload)) = node.sole_field() else {
        return Ok(None);
    };

    match payload {
        Node::Tag(tag) if tag == SELF_TAG => Ok(Some(ReferenceTarget::SelfEntity)),
        Node::Record(_) => match payload.sole_field() {
            Some((SELF_TAG, Node::Null)) => Ok(Some(ReferenceTarget::SelfEntity)),
            Some((SELF_TAG, Node::Record(empty))) if empty.is_empty() => Ok(Some(ReferenceTarget::SelfEntity)),
            Some((ENTITY_FIELD, Node::String(name))) if !name.is_empty() => {
                Ok(Some(ReferenceTarget::Named(name.clone())))
            }
            Some((ENTITY_FIELD, Node::String(_))) => Err(invalid("entity name is empty")),
            Some((ENTITY_FIELD, other)) => Err(invalid(format!(
                "entity name must be a string, found {}",
                other.kind_name()
            ))),
            _ => Err(invalid("expected {entity: \"name\"}")),
        },
        other => Err(invalid(format!(
            "expected `self` or {{entity: \"name\"}}, found {}",
            crate::error::describe(other)
        ))),
    }
}

/// Find every reference marker in a component literal
pub fn extract_references(
    owner: EntityPlaceholder,
    component: &str,
    tree: &Node,
) -> Result<Vec<UnresolvedReference>> {
    let mut found = Vec::new();
    let mut path = FieldPath::root();
    walk(tree, &mut path, &mut |field_path, target| {
        found.push(UnresolvedReference {
            owner,
            component: component.to_string(),
            field_path,
            target,
        })
    })?;
    Ok(found)
}

fn walk(
    node: &Node,
    path: &mut FieldPath,
    emit: &mut impl FnMut(FieldPath, ReferenceTarget),
) -> Result<()> {
    if let Some(target) = parse_marker(node).map_err(|e| relocate(e, path))? {
        emit(path.clone(), target);
        return Ok(());
    }

    match node {
        Node::Record(fields) => {
            for (name, child) in fields {
                path.push(FieldStep::Field(name.clone()));
                walk(child, path, emit)?;
                path.pop();
            }
        }
        Node::Tuple(elements) => {
            for (i, child) in elements.iter().enumerate() {
                path.push(FieldStep::Index(i));
                walk(child, path, emit)?;
                path.pop();
            }
        }
        _ => {}
    }
    Ok(())
}

fn relocate(mut err: DecodeError, path: &FieldPath) -> DecodeError {
    err.path = path.clone();
    err
}

fn invalid(reason: impl Into<String>) -> DecodeError {
    DecodeErrorKind::InvalidReferenceSyntax {
        reason: reason.into(),
    }
    .into()
}
