//! Prefab/override composition
//!
//! Field-wise and shallow: a field present in the overrides replaces the
//! base field wholesale, base-only fields stay where they are, and
//! override-only fields are appended. When the two sides are not both
//! struct-shaped, the overrides win outright.
//!
//! Literal merging is not aware of unions on its own: `{circle: ..}` merged
//! with `{box: ..}` is a two-field record that selects nothing.
//! [`merge_component`] consults the schema to avoid that.

use void_ir::{Node, Value};
use void_schema::{SchemaRegistry, TypeDescriptor, UnionDescriptor};

/// Merge two decoded values
pub fn merge(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Struct(mut base), Value::Struct(overrides)) => {
            for (name, value) in overrides.fields {
                base.set(name, value);
            }
            Value::Struct(base)
        }
        (_, overrides) => overrides,
    }
}

/// Merge two literal trees before decoding.
///
/// Used for prefab instances, whose overrides are usually partial records
/// that would not decode on their own.
pub fn merge_nodes(base: Node, overrides: Node) -> Node {
    match (base, overrides) {
        (Node::Record(mut base), Node::Record(overrides)) => {
            base.extend(overrides);
            Node::Record(base)
        }
        (_, overrides) => overrides,
    }
}

/// Merge two literals of the registered component type `component`.
///
/// Struct components merge like [`merge_nodes`]. For union components an
/// override naming a different variant than the base replaces the base;
/// two selectors of the same variant merge their payloads.
pub fn merge_component(registry: &SchemaRegistry, component: &str, base: Node, overrides: Node) -> Node {
    let union = match registry.lookup(component).map(|d| registry.resolve(d)) {
        Some(Ok(TypeDescriptor::Union(union))) => union,
        _ => return merge_nodes(base, overrides),
    };

    let base_variant = selected_variant(union, &base).map(str::to_owned);
    let override_variant = selected_variant(union, &overrides).map(str::to_owned);

    match (base_variant, override_variant) {
        (None, None) => merge_nodes(base, overrides),
        (Some(a), Some(b)) if a == b => match (base, overrides) {
            (Node::Record(mut base), Node::Record(mut overrides)) => {
                let payload = match (base.remove(&a), overrides.remove(&a)) {
                    (Some(base), Some(overrides)) => merge_nodes(base, overrides),
                    (_, overrides) => overrides.unwrap_or(Node::Null),
                };
                Node::record([(a, payload)])
            }
            (_, overrides) => overrides,
        },
        _ => overrides,
    }
}

/// Variant named by a bare tag or a `{variant: payload}` selector
fn selected_variant<'n>(union: &UnionDescriptor, node: &'n Node) -> Option<&'n str> {
    let name = match node {
        Node::Tag(name) => name.as_str(),
        _ => node.sole_field()?.0,
    };
    union.get(name).map(|_| name)
}
