//! Schema-directed coercion of literal trees into typed values
//!
//! [`Decoder::decode`] dispatches on the descriptor kind and recurses into
//! nested descriptors. Errors are returned on the first failure and carry
//! the field path from the decode root, assembled while the error unwinds.
//!
//! [`Decoder::decode_component`] also reports every reference marker it
//! decoded, including markers supplied by field defaults. Their paths
//! address the decoded value: struct fields and element indices as usual,
//! and a union payload always under its variant name.

use crate::config::DecoderConfig;
use crate::error::{DecodeError, DecodeErrorKind, Result};
use crate::reference::{parse_marker, ReferenceTarget, UnresolvedReference};
use crate::variant;
use void_core::EntityPlaceholder;
use void_ir::{FieldPath, FieldStep, Node, StructValue, Value};
use void_schema::{ScalarKind, SchemaRegistry, StructDescriptor, TypeDescriptor};

/// Interprets type descriptors over literal trees.
///
/// Holds only shared borrows of immutable data; decoders for independent
/// scenes can run on separate threads against the same registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r SchemaRegistry,
    config: DecoderConfig,
}

/// A decoded component and the references it still needs linked
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedComponent {
    pub value: Value,
    pub references: Vec<UnresolvedReference>,
}

/// Reference markers met during one decode
#[derive(Debug, Default)]
pub(crate) struct Markers {
    path: FieldPath,
    found: Vec<(FieldPath, ReferenceTarget)>,
}

impl Markers {
    /// Run `f` one step deeper in the decoded value
    pub(crate) fn enter<T>(&mut self, step: impl Into<FieldStep>, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(step);
        let out = f(self);
        self.path.pop();
        out
    }

    fn record(&mut self, target: ReferenceTarget) {
        self.found.push((self.path.clone(), target));
    }
}

impl<'r> Decoder<'r> {
    /// Create a decoder with the default configuration
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, DecoderConfig::default())
    }

    pub fn with_config(registry: &'r SchemaRegistry, config: DecoderConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode `node` against a registered type
    pub fn decode_named(&self, type_name: &str, node: &Node) -> Result<Value> {
        self.decode(self.lookup(type_name)?, node)
    }

    /// Decode `node` against `descriptor`
    pub fn decode(&self, descriptor: &TypeDescriptor, node: &Node) -> Result<Value> {
        self.decode_at(descriptor, node, &mut Markers::default())
    }

    /// Decode the literal of `component` owned by `owner`, collecting its
    /// entity references for the link pass
    pub fn decode_component(&self, owner: EntityPlaceholder, component: &str, node: &Node) -> Result<DecodedComponent> {
        let mut markers = Markers::default();
        let value = self.decode_at(self.lookup(component)?, node, &mut markers)?;

        let references = markers
            .found
            .into_iter()
            .map(|(field_path, target)| UnresolvedReference {
                owner,
                component: component.to_string(),
                field_path,
                target,
            })
            .collect();
        Ok(DecodedComponent { value, references })
    }

    pub(crate) fn decode_at(&self, descriptor: &TypeDescriptor, node: &Node, markers: &mut Markers) -> Result<Value> {
        match descriptor {
            TypeDescriptor::Scalar { scalar } => decode_scalar(*scalar, node),
            TypeDescriptor::Unit => match node {
                Node::Null => Ok(Value::Unit),
                Node::Record(fields) if fields.is_empty() => Ok(Value::Unit),
                _ => Err(DecodeErrorKind::mismatch("unit", node).into()),
            },
            TypeDescriptor::Optional { inner } => {
                if node.is_null() {
                    Ok(Value::Optional(None))
                } else {
                    Ok(Value::Optional(Some(Box::new(self.decode_at(inner, node, markers)?))))
                }
            }
            TypeDescriptor::FixedArray { element, len } => {
                let elements = node
                    .as_tuple()
                    .ok_or_else(|| DecodeErrorKind::mismatch(format!("array of {}", len), node))?;
                if elements.len() != *len {
                    return Err(DecodeErrorKind::ArraySizeMismatch {
                        expected: *len,
                        got: elements.len(),
                    }
                    .into());
                }
                self.decode_elements(element, elements, markers).map(Value::Array)
            }
            TypeDescriptor::List { element } => {
                let elements = node
                    .as_tuple()
                    .ok_or_else(|| DecodeErrorKind::mismatch("list", node))?;
                self.decode_elements(element, elements, markers).map(Value::List)
            }
            TypeDescriptor::Struct(s) => self.decode_struct_at(s, node, markers),
            TypeDescriptor::Union(u) => variant::resolve_union(self, u, node, markers),
            TypeDescriptor::EntityRef => match parse_marker(node)? {
                Some(target) => {
                    markers.record(target);
                    Ok(Value::EntityRef(None))
                }
                None => Err(DecodeErrorKind::InvalidReferenceSyntax {
                    reason: format!(
                        "expected {{ref: self}} or {{ref: {{entity: \"name\"}}}}, found {}",
                        crate::error::describe(node)
                    ),
                }
                .into()),
            },
            TypeDescriptor::Named { name } => self.decode_at(self.lookup(name)?, node, markers),
        }
    }

    /// Decode a record against a struct descriptor
    pub fn decode_struct(&self, descriptor: &StructDescriptor, node: &Node) -> Result<Value> {
        self.decode_struct_at(descriptor, node, &mut Markers::default())
    }

    pub(crate) fn decode_struct_at(
        &self,
        descriptor: &StructDescriptor,
        node: &Node,
        markers: &mut Markers,
    ) -> Result<Value> {
        let record = node
            .as_record()
            .ok_or_else(|| DecodeErrorKind::mismatch(format!("struct '{}'", descriptor.name), node))?;

        if let Some(unknown) = record.keys().find(|name| descriptor.get(name).is_none()) {
            return Err(DecodeError::new(DecodeErrorKind::UnknownField {
                structure: descriptor.name.clone(),
                field: unknown.clone(),
            })
            .within(unknown.as_str()));
        }

        let mut value = StructValue::new(descriptor.name.clone());
        for field in &descriptor.fields {
            let source = match (record.get(&field.name), &field.default) {
                (Some(explicit), _) => explicit,
                (None, Some(default)) => default,
                (None, None) => {
                    return Err(DecodeErrorKind::MissingField {
                        structure: descriptor.name.clone(),
                        field: field.name.clone(),
                    }
                    .into())
                }
            };

            let decoded = markers
                .enter(field.name.as_str(), |m| self.decode_at(&field.ty, source, m))
                .map_err(|e| e.within(field.name.as_str()))?;
            value.fields.push((field.name.clone(), decoded));
        }

        Ok(Value::Struct(value))
    }

    /// Follow `named` aliases to a structural descriptor
    pub fn resolve<'a>(&'a self, descriptor: &'a TypeDescriptor) -> Result<&'a TypeDescriptor> {
        self.registry.resolve(descriptor).map_err(|name| {
            DecodeError::new(DecodeErrorKind::UnknownType {
                name: name.to_string(),
            })
        })
    }

    fn lookup(&self, name: &str) -> Result<&'r TypeDescriptor> {
        self.registry.lookup(name).ok_or_else(|| {
            DecodeError::new(DecodeErrorKind::UnknownType {
                name: name.to_string(),
            })
        })
    }

    fn decode_elements(&self, element: &TypeDescriptor, nodes: &[Node], markers: &mut Markers) -> Result<Vec<Value>> {
        nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                markers
                    .enter(i, |m| self.decode_at(element, node, m))
                    .map_err(|e| e.within(FieldStep::Index(i)))
            })
            .collect()
    }
}

fn decode_scalar(kind: ScalarKind, node: &Node) -> Result<Value> {
    let value = match kind {
        ScalarKind::Bool => node.as_bool().map(Value::Bool),
        ScalarKind::Int => node.as_int().map(Value::Int),
        ScalarKind::Float => node.as_float().map(Value::Float),
        ScalarKind::String => node.as_str().map(Value::from),
    };
    value.ok_or_else(|| DecodeErrorKind::mismatch(kind.name(), node).into())
}
