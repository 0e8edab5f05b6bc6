//! Type descriptors
//!
//! A descriptor is the static description of a target shape. The serde
//! representation is internally tagged by `kind`, which is what catalogue
//! files use:
//!
//! ```toml
//! [types.Vec3]
//! kind = "fixed_array"
//! element = { kind = "scalar", scalar = "float" }
//! len = 3
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use void_ir::Node;

/// Scalar literal kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float; integer literals are accepted and widened
    Float,
    String,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural description of a decodable type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Scalar literal
    Scalar { scalar: ScalarKind },
    /// No data; payload of void union variants
    Unit,
    /// Value or null
    Optional { inner: Box<TypeDescriptor> },
    /// Tuple of exactly `len` elements
    FixedArray { element: Box<TypeDescriptor>, len: usize },
    /// Tuple of any length
    List { element: Box<TypeDescriptor> },
    /// Record with declared fields
    Struct(StructDescriptor),
    /// Tagged union
    Union(UnionDescriptor),
    /// Reference to another entity, linked after instantiation
    EntityRef,
    /// Another registered type, by name
    Named { name: String },
}

impl TypeDescriptor {
    pub fn bool() -> Self {
        Self::Scalar { scalar: ScalarKind::Bool }
    }

    pub fn int() -> Self {
        Self::Scalar { scalar: ScalarKind::Int }
    }

    pub fn float() -> Self {
        Self::Scalar { scalar: ScalarKind::Float }
    }

    pub fn string() -> Self {
        Self::Scalar { scalar: ScalarKind::String }
    }

    pub fn unit() -> Self {
        Self::Unit
    }

    pub fn entity_ref() -> Self {
        Self::EntityRef
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::Optional { inner: Box::new(inner) }
    }

    pub fn fixed_array(element: TypeDescriptor, len: usize) -> Self {
        Self::FixedArray {
            element: Box::new(element),
            len,
        }
    }

    pub fn list(element: TypeDescriptor) -> Self {
        Self::List {
            element: Box::new(element),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }

    /// Short name of the descriptor's shape, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar { scalar } => scalar.name(),
            Self::Unit => "unit",
            Self::Optional { .. } => "optional",
            Self::FixedArray { .. } => "fixed_array",
            Self::List { .. } => "list",
            Self::Struct(_) => "struct",
            Self::Union(_) => "union",
            Self::EntityRef => "entity_ref",
            Self::Named { .. } => "named",
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Visit every descriptor nested in this one, depth first, self included
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TypeDescriptor)) {
        visit(self);
        match self {
            Self::Optional { inner } => inner.walk(visit),
            Self::FixedArray { element, .. } | Self::List { element } => element.walk(visit),
            Self::Struct(s) => {
                for field in &s.fields {
                    field.ty.walk(visit);
                }
            }
            Self::Union(u) => {
                for variant in &u.variants {
                    variant.payload.walk(visit);
                }
            }
            Self::Scalar { .. } | Self::Unit | Self::EntityRef | Self::Named { .. } => {}
        }
    }
}

impl From<StructDescriptor> for TypeDescriptor {
    fn from(s: StructDescriptor) -> Self {
        Self::Struct(s)
    }
}

impl From<UnionDescriptor> for TypeDescriptor {
    fn from(u: UnionDescriptor) -> Self {
        Self::Union(u)
    }
}

/// A struct field declaration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Literal used when the field is absent; decoded like an explicit value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Node>,
}

impl FieldDescriptor {
    /// A field without a default must be supplied by the literal
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Struct shape: ordered field declarations
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StructDescriptor {
    /// Filled with the registration name when left empty
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a required field
    pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            default: None,
        });
        self
    }

    /// Add a field with a default literal
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: TypeDescriptor,
        default: impl Into<Node>,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            default: Some(default.into()),
        });
        self
    }

    /// Add an `optional<T>` field that defaults to null
    pub fn optional_field(self, name: impl Into<String>, inner: TypeDescriptor) -> Self {
        self.field_with_default(name, TypeDescriptor::optional(inner), Node::Null)
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_required())
    }
}

/// A union variant declaration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    pub name: String,
    #[serde(default = "unit_payload")]
    pub payload: TypeDescriptor,
}

fn unit_payload() -> TypeDescriptor {
    TypeDescriptor::Unit
}

/// Tagged union shape: variants in declaration order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnionDescriptor {
    /// Filled with the registration name when left empty
    #[serde(default)]
    pub name: String,
    pub variants: Vec<VariantDescriptor>,
}

impl UnionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Add a variant carrying a payload
    pub fn variant(mut self, name: impl Into<String>, payload: impl Into<TypeDescriptor>) -> Self {
        self.variants.push(VariantDescriptor {
            name: name.into(),
            payload: payload.into(),
        });
        self
    }

    /// Add a void variant
    pub fn void_variant(self, name: impl Into<String>) -> Self {
        self.variant(name, TypeDescriptor::Unit)
    }

    pub fn get(&self, name: &str) -> Option<&VariantDescriptor> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn variant_names(&self) -> Vec<String> {
        self.variants.iter().map(|v| v.name.clone()).collect()
    }
}
