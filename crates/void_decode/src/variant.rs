//! Tagged-union variant resolution
//!
//! Rules, in priority order:
//! 1. `tag(name)` selects a void variant.
//! 2. `{name: payload}` with a single field naming a variant selects it.
//! 3. Relaxed mode only: the first variant (declaration order) whose struct
//!    payload has all of its required fields present in the record.
//! 4. Otherwise the literal is rejected.

use crate::config::UnionMode;
use crate::decoder::{Decoder, Markers};
use crate::error::{AmbiguousUnionVariant, DecodeError, DecodeErrorKind, Result};
use std::collections::BTreeMap;
use void_ir::{Node, UnionValue, Value};
use void_schema::{SchemaRegistry, StructDescriptor, TypeDescriptor, UnionDescriptor, VariantDescriptor};

/// Resolve `node` to exactly one variant of `union` and decode its payload
///
/// References inside the payload are recorded under the variant name, so
/// selector and structural literals address the decoded value the same way.
pub(crate) fn resolve_union(
    decoder: &Decoder<'_>,
    union: &UnionDescriptor,
    node: &Node,
    markers: &mut Markers,
) -> Result<Value> {
    if let Node::Tag(name) = node {
        let variant = union.get(name).ok_or_else(|| unresolved(union))?;
        if !decoder.resolve(&variant.payload)?.is_unit() {
            return Err(DecodeErrorKind::VoidVariantExpected {
                variant: variant.name.clone(),
            }
            .into());
        }
        log::trace!("union '{}' resolved to '{}' by tag", union.name, name);
        return Ok(UnionValue::new(&union.name, name, Value::Unit).into());
    }

    if let Some((name, payload)) = node.sole_field() {
        if let Some(variant) = union.get(name) {
            let value = markers
                .enter(name, |m| decoder.decode_at(&variant.payload, payload, m))
                .map_err(|e| e.within(name))?;
            log::trace!("union '{}' resolved to '{}' by selector", union.name, name);
            return Ok(UnionValue::new(&union.name, name, value).into());
        }
    }

    if decoder.config().union_mode == UnionMode::Relaxed {
        if let Some(record) = node.as_record() {
            let candidates = structural_candidates(decoder.registry(), union, record);

            if let Some((variant, payload)) = candidates.first() {
                if candidates.len() > 1 && decoder.config().warn_on_ambiguous {
                    let ambiguity = AmbiguousUnionVariant {
                        union: union.name.clone(),
                        chosen: variant.name.clone(),
                        candidates: candidates.iter().map(|(v, _)| v.name.clone()).collect(),
                    };
                    log::warn!("{}", ambiguity);
                }

                let value = markers.enter(variant.name.as_str(), |m| {
                    decoder.decode_struct_at(payload, node, m)
                })?;
                log::trace!("union '{}' resolved to '{}' structurally", union.name, variant.name);
                return Ok(UnionValue::new(&union.name, &variant.name, value).into());
            }
        }
    }

    Err(unresolved(union))
}

/// Variants whose struct payload has every required field present in
/// `record`, in declaration order.
///
/// Payloads that are not structs (after alias resolution) never match.
pub fn structural_candidates<'a>(
    registry: &'a SchemaRegistry,
    union: &'a UnionDescriptor,
    record: &BTreeMap<String, Node>,
) -> Vec<(&'a VariantDescriptor, &'a StructDescriptor)> {
    union
        .variants
        .iter()
        .filter_map(|variant| match registry.resolve(&variant.payload) {
            Ok(TypeDescriptor::Struct(s)) => Some((variant, s)),
            _ => None,
        })
        .filter(|(_, s)| s.required_fields().all(|f| record.contains_key(&f.name)))
        .collect()
}

fn unresolved(union: &UnionDescriptor) -> DecodeError {
    DecodeErrorKind::UnresolvedUnionVariant {
        available: union.variant_names(),
    }
    .into()
}
