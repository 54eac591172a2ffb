use std::fmt;

use serde::Serialize;

/// Concrete scalar types a descriptor can bottom out in. Unlike
/// [`crate::ir::PrimitiveType`] these carry the format refinements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Integer,
    Int64,
    Number,
    Boolean,
    DateTime,
    Date,
    Uuid,
    Binary,
    Null,
    Any,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Int64 => "int64",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::DateTime => "date-time",
            Primitive::Date => "date",
            Primitive::Uuid => "uuid",
            Primitive::Binary => "binary",
            Primitive::Null => "null",
            Primitive::Any => "any",
        }
    }
}

/// The canonical resolved type of a schema or an operation result.
///
/// Built only by [`super::UnifiedTypeService`]; the constructors here keep
/// the shape normalized (no `Optional(Optional(_))`, no one-armed unions).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Optional(Box<TypeDescriptor>),
    List(Box<TypeDescriptor>),
    Map(Box<TypeDescriptor>),
    /// A schema table entry, by table name.
    Named(String),
    Union(Vec<TypeDescriptor>),
    /// An enum schema table entry, by table name.
    Enum(String),
}

impl TypeDescriptor {
    pub fn optional(inner: TypeDescriptor) -> Self {
        match inner {
            TypeDescriptor::Optional(_) => inner,
            other => TypeDescriptor::Optional(Box::new(other)),
        }
    }

    pub fn list(inner: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(inner))
    }

    pub fn map(value: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(value))
    }

    /// Union of `variants`, dropping repeats. A single remaining variant
    /// stands for itself.
    pub fn union(variants: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let mut unique: Vec<TypeDescriptor> = Vec::new();
        for v in variants {
            if !unique.contains(&v) {
                unique.push(v);
            }
        }
        match unique.len() {
            0 => TypeDescriptor::Primitive(Primitive::Any),
            1 => unique.remove(0),
            _ => TypeDescriptor::Union(unique),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeDescriptor::Optional(_))
    }

    /// Schema table names this descriptor mentions, in first-seen order.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeDescriptor::Named(n) | TypeDescriptor::Enum(n) => {
                if !out.contains(&n.as_str()) {
                    out.push(n);
                }
            }
            TypeDescriptor::Optional(inner)
            | TypeDescriptor::List(inner)
            | TypeDescriptor::Map(inner) => inner.collect_names(out),
            TypeDescriptor::Union(variants) => {
                for v in variants {
                    v.collect_names(out);
                }
            }
            TypeDescriptor::Primitive(_) => {}
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(p) => f.write_str(p.as_str()),
            TypeDescriptor::Optional(inner) => write!(f, "optional<{inner}>"),
            TypeDescriptor::List(inner) => write!(f, "list<{inner}>"),
            TypeDescriptor::Map(inner) => write!(f, "map<{inner}>"),
            TypeDescriptor::Named(name) => f.write_str(name),
            TypeDescriptor::Enum(name) => write!(f, "enum {name}"),
            TypeDescriptor::Union(variants) => {
                for (i, v) in variants.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
        }
    }
}
