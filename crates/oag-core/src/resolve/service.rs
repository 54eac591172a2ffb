use crate::ir::{
    IrOperation, IrParameter, IrRequestBody, IrSchema, PrimitiveType, SchemaKind, SchemaTable,
};

use super::descriptor::{Primitive, TypeDescriptor};
use super::envelope::EnvelopeRule;

/// The one place schemas and operations are turned into [`TypeDescriptor`]s.
///
/// Every public method is a thin wrapper over the same private `resolve`
/// routine, so a signature and the response handling for the same operation
/// cannot disagree. References resolve to `Named`/`Enum` by table name and
/// are never expanded, which keeps resolution finite on cyclic graphs.
#[derive(Debug, Clone)]
pub struct UnifiedTypeService<'a> {
    schemas: &'a SchemaTable,
    envelope: EnvelopeRule,
}

impl<'a> UnifiedTypeService<'a> {
    pub fn new(schemas: &'a SchemaTable) -> Self {
        Self {
            schemas,
            envelope: EnvelopeRule::default(),
        }
    }

    pub fn with_envelope(mut self, envelope: EnvelopeRule) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn schemas(&self) -> &'a SchemaTable {
        self.schemas
    }

    pub fn resolve_schema(&self, schema: &IrSchema, required: bool) -> TypeDescriptor {
        self.resolve(schema, required)
    }

    /// The definition of a schema table entry (what a model file declares).
    pub fn resolve_named(&self, name: &str) -> Option<TypeDescriptor> {
        self.schemas.get(name).map(|s| self.resolve(s, true))
    }

    pub fn resolve_parameter(&self, param: &IrParameter) -> TypeDescriptor {
        self.resolve(&param.schema, param.required)
    }

    pub fn resolve_request_body(&self, body: &IrRequestBody) -> TypeDescriptor {
        self.resolve(&body.schema, body.required)
    }

    /// The type a caller of `op` gets back, and whether it has to be taken out
    /// of an envelope first. No success body resolves to `null`.
    pub fn resolve_operation_response(&self, op: &IrOperation) -> (TypeDescriptor, bool) {
        let Some(schema) = op.success_response().and_then(|r| r.schema.as_ref()) else {
            return (TypeDescriptor::Primitive(Primitive::Null), false);
        };
        match self.envelope.payload(self.schemas, schema) {
            Some(payload) => {
                log::debug!("{}: unwrapping envelope response", op.operation_id);
                (self.resolve(payload, true), true)
            }
            None => (self.resolve(schema, true), false),
        }
    }

    /// The return type used in the operation's signature.
    pub fn return_type(&self, op: &IrOperation) -> TypeDescriptor {
        self.resolve_operation_response(op).0
    }

    fn resolve(&self, schema: &IrSchema, required: bool) -> TypeDescriptor {
        let mut nullable = schema.nullable;
        let base = match &schema.kind {
            SchemaKind::Reference(name) => match self.schemas.get(name) {
                None => TypeDescriptor::Primitive(Primitive::Any),
                Some(target) => {
                    nullable |= target.nullable;
                    if target.is_placeholder() {
                        TypeDescriptor::Primitive(Primitive::Any)
                    } else if matches!(target.kind, SchemaKind::Enum(_)) {
                        TypeDescriptor::Enum(name.clone())
                    } else {
                        TypeDescriptor::Named(name.clone())
                    }
                }
            },
            SchemaKind::Primitive(p) => TypeDescriptor::Primitive(refine(*p, schema.format.as_deref())),
            SchemaKind::Object => match &schema.name {
                Some(name) => TypeDescriptor::Named(name.clone()),
                None => TypeDescriptor::map(
                    schema
                        .additional_properties
                        .as_deref()
                        .map(|v| self.resolve(v, true))
                        .unwrap_or(TypeDescriptor::Primitive(Primitive::Any)),
                ),
            },
            SchemaKind::Array => TypeDescriptor::list(
                schema
                    .items
                    .as_deref()
                    .map(|items| self.resolve(items, true))
                    .unwrap_or(TypeDescriptor::Primitive(Primitive::Any)),
            ),
            SchemaKind::Enum(p) => match &schema.name {
                Some(name) => TypeDescriptor::Enum(name.clone()),
                None => TypeDescriptor::Primitive(refine(*p, schema.format.as_deref())),
            },
            // Nullable variants make the whole union optional
            SchemaKind::Union => {
                let mut variants = Vec::with_capacity(schema.variants.len());
                for variant in &schema.variants {
                    match self.resolve(variant, true) {
                        TypeDescriptor::Optional(inner) => {
                            nullable = true;
                            variants.push(*inner);
                        }
                        other => variants.push(other),
                    }
                }
                TypeDescriptor::union(variants)
            }
        };

        if base == TypeDescriptor::Primitive(Primitive::Null) {
            return base;
        }
        if !required || nullable {
            TypeDescriptor::optional(base)
        } else {
            base
        }
    }
}

/// Narrow a primitive by its `format` hint.
fn refine(p: PrimitiveType, format: Option<&str>) -> Primitive {
    match (p, format) {
        (PrimitiveType::String, Some("date-time")) => Primitive::DateTime,
        (PrimitiveType::String, Some("date")) => Primitive::Date,
        (PrimitiveType::String, Some("uuid")) => Primitive::Uuid,
        (PrimitiveType::String, Some("binary" | "byte")) => Primitive::Binary,
        (PrimitiveType::String, _) => Primitive::String,
        (PrimitiveType::Integer, Some("int64")) => Primitive::Int64,
        (PrimitiveType::Integer, _) => Primitive::Integer,
        (PrimitiveType::Number, _) => Primitive::Number,
        (PrimitiveType::Boolean, _) => Primitive::Boolean,
        (PrimitiveType::Null, _) => Primitive::Null,
        (PrimitiveType::Any, _) => Primitive::Any,
    }
}
