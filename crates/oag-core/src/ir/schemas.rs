use std::ops::Index;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;

/// Scalar kinds a schema can bottom out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
    /// Untyped; also the placeholder for nodes that could not be parsed.
    Any,
}

/// What shape an [`IrSchema`] has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "lowercase")]
pub enum SchemaKind {
    Primitive(PrimitiveType),
    Object,
    Array,
    /// Enumerated literals of a single primitive kind.
    Enum(PrimitiveType),
    Union,
    /// A lookup by name into the [`SchemaTable`].
    Reference(String),
}

/// Discriminator for union types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrDiscriminator {
    pub property_name: String,
    /// Discriminator value → schema table name.
    pub mapping: IndexMap<String, String>,
}

/// One schema node. Named schemas live in the [`SchemaTable`]; every
/// cross-schema edge is a [`SchemaKind::Reference`] by name, so the node tree
/// is always finite even when the schema graph is cyclic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrSchema {
    pub name: Option<String>,
    pub kind: SchemaKind,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, IrSchema>,
    #[serde(skip_serializing_if = "IndexSet::is_empty")]
    pub required: IndexSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<IrSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<IrSchema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<IrSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<IrDiscriminator>,
}

impl IrSchema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            name: None,
            kind,
            properties: IndexMap::new(),
            required: IndexSet::new(),
            items: None,
            additional_properties: None,
            variants: Vec::new(),
            enum_values: Vec::new(),
            format: None,
            nullable: false,
            description: None,
            discriminator: None,
        }
    }

    pub fn primitive(p: PrimitiveType) -> Self {
        Self::new(SchemaKind::Primitive(p))
    }

    /// The opaque stand-in for a node that could not be parsed.
    pub fn placeholder() -> Self {
        Self::primitive(PrimitiveType::Any)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Reference(name.into()))
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == SchemaKind::Primitive(PrimitiveType::Any)
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.contains(property)
    }

    /// Name of the table entry this node points at, if it is a reference.
    pub fn reference_target(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Reference(name) => Some(name),
            _ => None,
        }
    }
}

/// The arena of named schemas, keyed by component name (or by the synthesized
/// name of a promoted inline schema) in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaTable(IndexMap<String, IrSchema>);

impl SchemaTable {
    pub fn get(&self, name: &str) -> Option<&IrSchema> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IrSchema)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, name: String, schema: IrSchema) {
        self.0.insert(name, schema);
    }

    pub(crate) fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(&str) -> K) {
        self.0.sort_by_cached_key(|name, _| key(name));
    }
}

impl Index<&str> for SchemaTable {
    type Output = IrSchema;

    fn index(&self, name: &str) -> &IrSchema {
        &self.0[name]
    }
}

impl FromIterator<(String, IrSchema)> for SchemaTable {
    fn from_iter<T: IntoIterator<Item = (String, IrSchema)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
