//! Decoded values
//!
//! A [`Value`] is shaped by the type descriptor it was decoded against:
//! struct fields appear in declaration order, a union carries exactly one
//! active variant, and entity references start out empty until the scene's
//! link pass fills them in.

use crate::path::{FieldPath, FieldStep};
use void_core::EntityId;

/// A typed value produced by decoding
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Payload of a void union variant
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Optional value
    Optional(Option<Box<Value>>),
    /// Fixed-size array; length fixed by its descriptor
    Array(Vec<Value>),
    /// Dynamic list
    List(Vec<Value>),
    /// Struct instance
    Struct(StructValue),
    /// Union instance with one active variant
    Union(UnionValue),
    /// Entity reference; `None` until linked
    EntityRef(Option<EntityId>),
}

/// A decoded struct with fields in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    /// Struct type name
    pub name: String,
    /// Field values, names unique
    pub fields: Vec<(String, Value)>,
}

impl StructValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Replace an existing field in place, or append a new one
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

/// A decoded union with its active variant
#[derive(Debug, Clone, PartialEq)]
pub struct UnionValue {
    /// Union type name
    pub union: String,
    /// Active variant name
    pub variant: String,
    /// Variant payload ([`Value::Unit`] for void variants)
    pub payload: Box<Value>,
}

impl UnionValue {
    pub fn new(union: impl Into<String>, variant: impl Into<String>, payload: Value) -> Self {
        Self {
            union: union.into(),
            variant: variant.into(),
            payload: Box::new(payload),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(*self.payload, Value::Unit)
    }
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionValue> {
        match self {
            Self::Union(u) => Some(u),
            _ => None,
        }
    }

    /// Elements of an array or list
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) | Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Linked entity of an entity reference, looking through `Optional`
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Self::EntityRef(id) => *id,
            Self::Optional(Some(inner)) => inner.as_entity(),
            _ => None,
        }
    }

    /// Get a field of a struct value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_struct()?.get(name)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Optional(_) => "optional",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Struct(_) => "struct",
            Self::Union(_) => "union",
            Self::EntityRef(_) => "entity_ref",
        }
    }

    // ========================================================================
    // Path navigation
    // ========================================================================

    /// Follow a path into this value.
    ///
    /// `Some(..)` optionals are transparent. A union payload is entered
    /// through a `Field` step naming the active variant, however the variant
    /// was selected in the literal.
    pub fn lookup(&self, path: &FieldPath) -> Option<&Value> {
        self.lookup_steps(path.steps())
    }

    /// Mutable variant of [`Value::lookup`]
    pub fn lookup_mut(&mut self, path: &FieldPath) -> Option<&mut Value> {
        self.lookup_steps_mut(path.steps())
    }

    fn lookup_steps(&self, steps: &[FieldStep]) -> Option<&Value> {
        let Some((step, rest)) = steps.split_first() else {
            return Some(self);
        };

        match (self, step) {
            (Self::Struct(s), FieldStep::Field(name)) => s.get(name)?.lookup_steps(rest),
            (Self::Array(v) | Self::List(v), FieldStep::Index(i)) => v.get(*i)?.lookup_steps(rest),
            (Self::Optional(Some(inner)), _) => inner.lookup_steps(steps),
            (Self::Union(u), FieldStep::Field(name)) if *name == u.variant => u.payload.lookup_steps(rest),
            _ => None,
        }
    }

    fn lookup_steps_mut(&mut self, steps: &[FieldStep]) -> Option<&mut Value> {
        let Some((step, rest)) = steps.split_first() else {
            return Some(self);
        };

        match (self, step) {
            (Self::Struct(s), FieldStep::Field(name)) => s.get_mut(name)?.lookup_steps_mut(rest),
            (Self::Array(v) | Self::List(v), FieldStep::Index(i)) => {
                v.get_mut(*i)?.lookup_steps_mut(rest)
            }
            (Self::Optional(Some(inner)), _) => inner.lookup_steps_mut(steps),
            (Self::Union(u), FieldStep::Field(name)) if *name == u.variant => {
                u.payload.lookup_steps_mut(rest)
            }
            _ => None,
        }
    }

    /// The entity reference slot at this value, looking through `Some(..)`
    pub fn entity_slot_mut(&mut self) -> Option<&mut Option<EntityId>> {
        match self {
            Self::EntityRef(slot) => Some(slot),
            Self::Optional(Some(inner)) => inner.entity_slot_mut(),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Unit
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<StructValue> for Value {
    fn from(v: StructValue) -> Self {
        Self::Struct(v)
    }
}

impl From<UnionValue> for Value {
    fn from(v: UnionValue) -> Self {
        Self::Union(v)
    }
}
