//! Untyped literal trees
//!
//! A [`Node`] is what an authoring format parses into before any schema is
//! consulted. Nodes can be built programmatically or read through serde from
//! any self-describing format (JSON, TOML, ...). Serde-read trees never contain
//! [`Node::Tag`]: formats without bare symbols spell void union variants with
//! the selector form `{"point": null}` instead.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A literal definition tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Null/absent literal
    Null,
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// String literal
    String(String),
    /// Bare symbolic literal, e.g. a void union variant
    Tag(String),
    /// Named fields, unordered, names unique
    Record(BTreeMap<String, Node>),
    /// Ordered elements
    Tuple(Vec<Node>),
}

impl Node {
    /// Create a null node
    pub fn null() -> Self {
        Self::Null
    }

    /// Create a bare tag
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// Create a record from name/node pairs. Later duplicates replace earlier ones.
    pub fn record<K: Into<String>, V: Into<Node>>(fields: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// An empty record
    pub fn empty_record() -> Self {
        Self::Record(BTreeMap::new())
    }

    /// Create a tuple
    pub fn tuple<V: Into<Node>>(elements: impl IntoIterator<Item = V>) -> Self {
        Self::Tuple(elements.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

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

    /// Float view; integer literals widen
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&str> {
        match self {
            Self::Tag(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Node]> {
        match self {
            Self::Tuple(t) => Some(t),
            _ => None,
        }
    }

    /// Get a field of a record node
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_record()?.get(key)
    }

    /// If this is a record with exactly one field, that field
    pub fn sole_field(&self) -> Option<(&str, &Node)> {
        let record = self.as_record()?;
        if record.len() != 1 {
            return None;
        }
        record.iter().next().map(|(k, v)| (k.as_str(), v))
    }

    /// Short name of the node's shape, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Tag(_) => "tag",
            Self::Record(_) => "record",
            Self::Tuple(_) => "tuple",
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::Null
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Tag(t) => write!(f, "{}", t),
            Self::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, node)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, node)?;
                }
                write!(f, "}}")
            }
            Self::Tuple(elements) => {
                write!(f, "(")?;
                for (i, node) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", node)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<bool> for Node {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Node {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Node {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Node {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Node {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Node {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<V: Into<Node>> From<Vec<V>> for Node {
    fn from(v: Vec<V>) -> Self {
        Self::tuple(v)
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::record(iter)
    }
}

// ============================================================================
// Serde
// ============================================================================

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::String(s) => serializer.serialize_str(s),
            // Bare tags have no counterpart in serde formats; the selector
            // form reads back as the same void variant
            Self::Tag(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name, &())?;
                map.end()
            }
            Self::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, node) in fields {
                    map.serialize_entry(name, node)?;
                }
                map.end()
            }
            Self::Tuple(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for node in elements {
                    seq.serialize_element(node)?;
                }
                seq.end()
            }
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a scene literal")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        i64::try_from(v)
            .map(Node::Int)
            .map_err(|_| E::custom(format!("integer literal {} out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(node) = seq.next_element()? {
            elements.push(node);
        }
        Ok(Node::Tuple(elements))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut fields = BTreeMap::new();
        while let Some((name, node)) = map.next_entry::<String, Node>()? {
            if fields.contains_key(&name) {
                return Err(de::Error::custom(format!("duplicate field `{}`", name)));
            }
            fields.insert(name, node);
        }
        Ok(Node::Record(fields))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}
