use std::collections::HashMap;

use heck::ToPascalCase;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Diagnostic, SchemaIssue};
use crate::ir::{IrDiscriminator, IrSchema, PrimitiveType, SchemaKind, SchemaTable};
use crate::parse::ref_resolve::parse_ref_name;
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType};

use super::name_normalizer::type_name;
use super::promote_inline::{UsedNames, is_promotable};

/// Builds [`IrSchema`] nodes from document schemas and owns the schema table
/// while it is being filled.
///
/// References become [`SchemaKind::Reference`] nodes; their targets are parsed
/// on demand into the table. A target that is already being parsed further
/// up the stack is left as a forward reference, which is what lets `A -> B -> A`
/// terminate. Nodes that cannot be parsed become `Primitive(Any)` and leave a
/// [`Diagnostic`] behind.
pub struct SchemaParser<'a> {
    components: Option<&'a IndexMap<String, SchemaOrRef>>,
    table: SchemaTable,
    order: HashMap<String, usize>,
    next_order: usize,
    resolving: Vec<String>,
    merging: Vec<String>,
    used_names: UsedNames,
    depth: usize,
    max_depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> SchemaParser<'a> {
    pub fn new(components: Option<&'a IndexMap<String, SchemaOrRef>>, max_depth: usize) -> Self {
        let mut order = HashMap::new();
        let mut used_names = UsedNames::default();
        for (i, name) in components.into_iter().flat_map(|c| c.keys()).enumerate() {
            order.insert(name.clone(), i);
            used_names.reserve(name);
        }
        Self {
            components,
            table: SchemaTable::default(),
            next_order: order.len(),
            order,
            resolving: Vec::new(),
            merging: Vec::new(),
            used_names,
            depth: 0,
            max_depth,
            diagnostics: Vec::new(),
        }
    }

    /// Parse every component schema into the table, in document order.
    pub fn parse_components(&mut self) {
        let components = self.components;
        for name in components.into_iter().flat_map(|c| c.keys()) {
            self.ensure_named(name);
        }
    }

    /// Parse the component `name` into the table unless it is already there
    /// or currently being parsed. Returns false if no such component exists.
    pub fn ensure_named(&mut self, name: &str) -> bool {
        if self.table.contains(name) || self.resolving.iter().any(|n| n == name) {
            return true;
        }
        let Some(node) = self.components.and_then(|c| c.get(name)) else {
            return false;
        };

        // A component gets the full depth budget wherever it is first reached
        self.resolving.push(name.to_string());
        let outer_depth = std::mem::take(&mut self.depth);
        let mut schema = self.build_node(&type_name(name), node);
        self.depth = outer_depth;
        self.resolving.pop();

        schema.name = Some(name.to_string());
        self.table.insert(name.to_string(), schema);
        true
    }

    /// Parse a schema found below `ctx` (a property, item, operation body...).
    /// Inline objects with properties and inline enums are registered in the
    /// table under a name derived from `ctx` and replaced by a reference.
    pub fn parse_nested(&mut self, ctx: &str, node: &SchemaOrRef) -> IrSchema {
        let schema = self.descend(ctx, node);
        self.promote(ctx, schema)
    }

    /// Record a problem found outside of schema parsing proper.
    pub fn record(&mut self, location: &str, issue: SchemaIssue) {
        match &issue {
            SchemaIssue::UnresolvedReference(r) => {
                log::warn!("{location}: unresolved reference {r}")
            }
            SchemaIssue::Malformed => log::warn!("{location}: malformed schema node"),
            SchemaIssue::CycleDepthExceeded { max_depth } => {
                log::warn!("{location}: nesting deeper than {max_depth}, using an untyped placeholder")
            }
        }
        self.diagnostics.push(Diagnostic {
            location: location.to_string(),
            issue,
        });
    }

    /// Hand over the finished table (component order, then synthesized names
    /// in creation order) and the collected diagnostics.
    pub fn finish(self) -> (SchemaTable, Vec<Diagnostic>) {
        let Self {
            mut table,
            order,
            diagnostics,
            ..
        } = self;
        table.sort_by_key(|name| order.get(name).copied().unwrap_or(usize::MAX));
        (table, diagnostics)
    }

    fn descend(&mut self, ctx: &str, node: &SchemaOrRef) -> IrSchema {
        if self.depth >= self.max_depth {
            self.record(
                ctx,
                SchemaIssue::CycleDepthExceeded {
                    max_depth: self.max_depth,
                },
            );
            return IrSchema::placeholder();
        }
        self.depth += 1;
        let schema = self.build_node(ctx, node);
        self.depth -= 1;
        schema
    }

    fn promote(&mut self, ctx: &str, mut schema: IrSchema) -> IrSchema {
        if !is_promotable(&schema) {
            return schema;
        }

        let name = self.used_names.unique_name(ctx);
        log::debug!("promoting inline schema at {ctx} to {name}");
        let nullable = schema.nullable;
        schema.name = Some(name.clone());
        self.order.insert(name.clone(), self.next_order);
        self.next_order += 1;
        self.table.insert(name.clone(), schema);

        let mut reference = IrSchema::reference(name);
        reference.nullable = nullable;
        reference
    }

    fn build_node(&mut self, ctx: &str, node: &SchemaOrRef) -> IrSchema {
        match node {
            SchemaOrRef::Ref { ref_path } => self.reference(ctx, ref_path),
            SchemaOrRef::Schema(schema) => self.build(ctx, schema),
            SchemaOrRef::Malformed(_) => {
                self.record(ctx, SchemaIssue::Malformed);
                IrSchema::placeholder()
            }
        }
    }

    fn reference(&mut self, ctx: &str, ref_path: &str) -> IrSchema {
        let target = parse_ref_name(ref_path)
            .filter(|name| self.components.is_some_and(|c| c.contains_key(name)));
        let Some(name) = target else {
            self.record(ctx, SchemaIssue::UnresolvedReference(ref_path.to_string()));
            return IrSchema::placeholder();
        };

        if self.resolving.contains(&name) {
            log::debug!("{ctx}: cycle through {name}, leaving a forward reference");
        } else if self.depth < self.max_depth {
            self.ensure_named(&name);
        }
        IrSchema::reference(name)
    }

    fn build(&mut self, ctx: &str, schema: &Schema) -> IrSchema {
        let mut out = if let Some(value) = &schema.const_value {
            enumeration(std::slice::from_ref(value))
        } else if !schema.enum_values.is_empty() {
            enumeration(&schema.enum_values)
        } else if !schema.all_of.is_empty() {
            self.all_of(ctx, schema)
        } else if !schema.one_of.is_empty() || !schema.any_of.is_empty() {
            self.union(ctx, schema)
        } else {
            self.typed(ctx, schema)
        };

        out.nullable |= schema.declares_nullable();
        if out.format.is_none() {
            out.format = schema.format.clone();
        }
        if schema.description.is_some() {
            out.description = schema.description.clone();
        }
        out
    }

    fn typed(&mut self, ctx: &str, schema: &Schema) -> IrSchema {
        let types = schema
            .schema_type
            .as_ref()
            .map(|t| t.non_null())
            .unwrap_or_default();

        match types.as_slice() {
            [] if !schema.properties.is_empty() || schema.additional_properties.is_some() => {
                self.object(ctx, schema)
            }
            [] if schema.items.is_some() => self.array(ctx, schema),
            [] if schema.schema_type.is_some() => {
                let mut null = IrSchema::primitive(PrimitiveType::Null);
                null.nullable = true;
                null
            }
            [] => schema
                .format
                .as_deref()
                .and_then(format_primitive)
                .map_or_else(IrSchema::placeholder, IrSchema::primitive),
            [single] => self.single(ctx, *single, schema),
            many => {
                let mut union = IrSchema::new(SchemaKind::Union);
                for (i, t) in many.iter().enumerate() {
                    let variant_ctx = format!("{ctx}Variant{}", i + 1);
                    let variant = self.single(&variant_ctx, *t, schema);
                    union.variants.push(self.promote(&variant_ctx, variant));
                }
                union
            }
        }
    }

    fn single(&mut self, ctx: &str, t: SchemaType, schema: &Schema) -> IrSchema {
        let primitive = match t {
            SchemaType::Object => return self.object(ctx, schema),
            SchemaType::Array => return self.array(ctx, schema),
            SchemaType::String => PrimitiveType::String,
            SchemaType::Integer => PrimitiveType::Integer,
            SchemaType::Number => PrimitiveType::Number,
            SchemaType::Boolean => PrimitiveType::Boolean,
            SchemaType::Null => PrimitiveType::Null,
        };
        let mut out = IrSchema::primitive(primitive);
        out.format = schema.format.clone();
        out
    }

    fn array(&mut self, ctx: &str, schema: &Schema) -> IrSchema {
        let mut out = IrSchema::new(SchemaKind::Array);
        if let Some(items) = &schema.items {
            out.items = Some(Box::new(self.parse_nested(&format!("{ctx}Item"), items)));
        }
        out
    }

    fn object(&mut self, ctx: &str, schema: &Schema) -> IrSchema {
        let mut out = IrSchema::new(SchemaKind::Object);
        for (prop, node) in &schema.properties {
            let prop_ctx = format!("{ctx}{}", prop.to_pascal_case());
            let parsed = self.parse_nested(&prop_ctx, node);
            out.properties.insert(prop.clone(), parsed);
        }
        out.required = schema.required.iter().cloned().collect();
        out.additional_properties = match &schema.additional_properties {
            Some(AdditionalProperties::Bool(true)) => Some(Box::new(IrSchema::placeholder())),
            Some(AdditionalProperties::Schema(node)) => {
                Some(Box::new(self.parse_nested(&format!("{ctx}Value"), node)))
            }
            Some(AdditionalProperties::Bool(false)) | None => None,
        };
        out
    }

    fn union(&mut self, ctx: &str, schema: &Schema) -> IrSchema {
        let mut nullable = false;
        let members: Vec<&SchemaOrRef> = schema
            .one_of
            .iter()
            .chain(&schema.any_of)
            .filter(|m| {
                let null = m.is_null_type();
                nullable |= null;
                !null
            })
            .collect();

        let mut out = match members.as_slice() {
            [] => IrSchema::primitive(PrimitiveType::Null),
            [only] => self.descend(ctx, only),
            _ => {
                let mut union = IrSchema::new(SchemaKind::Union);
                for (i, member) in members.iter().enumerate() {
                    let variant_ctx = format!("{ctx}Variant{}", i + 1);
                    union.variants.push(self.parse_nested(&variant_ctx, member));
                }
                union.discriminator = schema.discriminator.as_ref().map(|d| IrDiscriminator {
                    property_name: d.property_name.clone(),
                    mapping: d
                        .mapping
                        .iter()
                        .map(|(value, target)| {
                            let name = parse_ref_name(target).unwrap_or_else(|| target.clone());
                            (value.clone(), name)
                        })
                        .collect(),
                });
                union
            }
        };
        out.nullable |= nullable;
        out
    }

    fn all_of(&mut self, ctx: &str, schema: &Schema) -> IrSchema {
        if let [only] = schema.all_of.as_slice() {
            if schema.properties.is_empty() {
                return self.descend(ctx, only);
            }
        }

        let mut merged = Schema::default();
        for member in &schema.all_of {
            self.merge_into(ctx, &mut merged, member);
        }
        merge_own(&mut merged, schema);
        self.object(ctx, &merged)
    }

    fn merge_into(&mut self, ctx: &str, target: &mut Schema, node: &SchemaOrRef) {
        match node {
            SchemaOrRef::Ref { ref_path } => {
                let name = parse_ref_name(ref_path);
                let definition = name
                    .as_ref()
                    .and_then(|n| self.components.and_then(|c| c.get(n)));
                let (Some(name), Some(definition)) = (name, definition) else {
                    self.record(ctx, SchemaIssue::UnresolvedReference(ref_path.clone()));
                    return;
                };
                if self.merging.contains(&name) {
                    log::debug!("{ctx}: allOf cycle through {name}, skipping");
                    return;
                }
                self.merging.push(name);
                self.merge_into(ctx, target, definition);
                self.merging.pop();
            }
            SchemaOrRef::Schema(member) => {
                for inner in &member.all_of {
                    self.merge_into(ctx, target, inner);
                }
                merge_own(target, member);
            }
            SchemaOrRef::Malformed(_) => self.record(ctx, SchemaIssue::Malformed),
        }
    }
}

/// Fold the object keywords of `source` into `target`; later members win.
fn merge_own(target: &mut Schema, source: &Schema) {
    for (name, prop) in &source.properties {
        target.properties.insert(name.clone(), prop.clone());
    }
    for name in &source.required {
        if !target.required.contains(name) {
            target.required.push(name.clone());
        }
    }
    if source.additional_properties.is_some() {
        target.additional_properties = source.additional_properties.clone();
    }
}

/// An enumeration of literals. A `null` literal only makes it nullable; if
/// the remaining literals span several primitive kinds the result is a union
/// of those kinds.
fn enumeration(values: &[Value]) -> IrSchema {
    let nullable = values.iter().any(Value::is_null);
    let literals: Vec<Value> = values.iter().filter(|v| !v.is_null()).cloned().collect();

    let mut kinds: Vec<PrimitiveType> = Vec::new();
    for literal in &literals {
        let kind = literal_kind(literal);
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.contains(&PrimitiveType::Integer) && kinds.contains(&PrimitiveType::Number) {
        kinds.retain(|k| *k != PrimitiveType::Integer);
    }

    let mut out = match kinds.as_slice() {
        [] => IrSchema::primitive(PrimitiveType::Null),
        [kind] => {
            let mut e = IrSchema::new(SchemaKind::Enum(*kind));
            e.enum_values = literals;
            e
        }
        many => {
            let mut u = IrSchema::new(SchemaKind::Union);
            u.variants = many.iter().map(|k| IrSchema::primitive(*k)).collect();
            u.enum_values = literals;
            u
        }
    };
    out.nullable = nullable;
    out
}

/// The primitive a typeless schema stands for, judged by its `format`.
fn format_primitive(format: &str) -> Option<PrimitiveType> {
    match format {
        "date-time" | "date" | "time" | "duration" | "uuid" | "email" | "uri" | "hostname"
        | "ipv4" | "ipv6" | "binary" | "byte" | "password" => Some(PrimitiveType::String),
        "int32" | "int64" => Some(PrimitiveType::Integer),
        "float" | "double" => Some(PrimitiveType::Number),
        _ => None,
    }
}

fn literal_kind(value: &Value) -> PrimitiveType {
    match value {
        Value::String(_) => PrimitiveType::String,
        Value::Bool(_) => PrimitiveType::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => PrimitiveType::Integer,
        Value::Number(_) => PrimitiveType::Number,
        Value::Null => PrimitiveType::Null,
        Value::Array(_) | Value::Object(_) => PrimitiveType::Any,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn components(value: Value) -> IndexMap<String, SchemaOrRef> {
        serde_json::from_value(value).unwrap()
    }

    fn parse_all(value: Value) -> (SchemaTable, Vec<Diagnostic>) {
        let schemas = components(value);
        let mut parser = SchemaParser::new(Some(&schemas), 100);
        parser.parse_components();
        parser.finish()
    }

    #[test]
    fn object_properties_keep_document_order() {
        let (table, diagnostics) = parse_all(json!({
            "Pet": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": { "type": "string" },
                    "id": { "type": "integer", "format": "int64" },
                    "tag": { "type": "string", "nullable": true }
                }
            }
        }));
        assert!(diagnostics.is_empty());
        let pet = &table["Pet"];
        assert_eq!(pet.kind, SchemaKind::Object);
        assert_eq!(pet.name.as_deref(), Some("Pet"));
        let keys: Vec<&str> = pet.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "id", "tag"]);
        assert_eq!(pet.properties["id"].format.as_deref(), Some("int64"));
        assert!(pet.properties["tag"].nullable);
        assert!(pet.is_required("name"));
        assert!(!pet.is_required("id"));
    }

    #[test]
    fn mutual_references_terminate() {
        let (table, diagnostics) = parse_all(json!({
            "A": { "type": "object", "properties": { "b": { "$ref": "#/components/schemas/B" } } },
            "B": { "type": "object", "properties": { "a": { "$ref": "#/components/schemas/A" } } }
        }));
        assert!(diagnostics.is_empty());
        assert_eq!(table.names().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(table["A"].properties["b"].reference_target(), Some("B"));
        assert_eq!(table["B"].properties["a"].reference_target(), Some("A"));
    }

    #[test]
    fn self_reference_terminates() {
        let (table, _) = parse_all(json!({
            "Node": {
                "type": "object",
                "properties": {
                    "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
                }
            }
        }));
        let items = table["Node"].properties["children"].items.as_deref().unwrap();
        assert_eq!(items.reference_target(), Some("Node"));
    }

    #[test]
    fn unresolved_reference_becomes_placeholder() {
        let (table, diagnostics) = parse_all(json!({
            "Pet": { "type": "object", "properties": { "owner": { "$ref": "#/components/schemas/Missing" } } }
        }));
        assert!(table["Pet"].properties["owner"].is_placeholder());
        assert_eq!(
            diagnostics[0].issue,
            SchemaIssue::UnresolvedReference("#/components/schemas/Missing".into())
        );
        assert_eq!(diagnostics[0].location, "PetOwner");
    }

    #[test]
    fn malformed_node_does_not_block_siblings() {
        let (table, diagnostics) = parse_all(json!({
            "Bad": true,
            "Pet": { "type": "object", "properties": { "x": 42, "name": { "type": "string" } } }
        }));
        assert!(table["Bad"].is_placeholder());
        assert!(table["Pet"].properties["x"].is_placeholder());
        assert_eq!(
            table["Pet"].properties["name"].kind,
            SchemaKind::Primitive(PrimitiveType::String)
        );
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.issue == SchemaIssue::Malformed));
    }

    #[test]
    fn depth_bound_yields_placeholder() {
        let schemas = components(json!({
            "Deep": {
                "type": "object",
                "properties": {
                    "a": { "type": "array", "items": { "type": "array", "items": { "type": "string" } } }
                }
            }
        }));
        let mut parser = SchemaParser::new(Some(&schemas), 2);
        parser.parse_components();
        let (table, diagnostics) = parser.finish();
        let outer = &table["Deep"].properties["a"];
        assert_eq!(outer.kind, SchemaKind::Array);
        assert!(outer.items.as_deref().unwrap().items.as_deref().unwrap().is_placeholder());
        assert_eq!(
            diagnostics[0].issue,
            SchemaIssue::CycleDepthExceeded { max_depth: 2 }
        );
    }

    #[test]
    fn referenced_component_gets_full_depth_budget() {
        let b = json!({ "type": "object", "properties": { "q": { "type": "array", "items": { "type": "string" } } } });
        let alone = components(json!({ "B": b.clone() }));
        let via_ref = components(json!({
            "A": { "type": "object", "properties": { "p": { "$ref": "#/components/schemas/B" } } },
            "B": b
        }));

        let mut parser = SchemaParser::new(Some(&alone), 2);
        parser.parse_components();
        let (alone_table, alone_diagnostics) = parser.finish();

        let mut parser = SchemaParser::new(Some(&via_ref), 2);
        parser.parse_components();
        let (ref_table, ref_diagnostics) = parser.finish();

        assert!(alone_diagnostics.is_empty());
        assert!(ref_diagnostics.is_empty());
        assert_eq!(alone_table["B"], ref_table["B"]);
        let items = ref_table["B"].properties["q"].items.as_deref().unwrap();
        assert_eq!(items.kind, SchemaKind::Primitive(PrimitiveType::String));
    }

    #[test]
    fn typeless_schema_with_format_is_inferred() {
        let (table, diagnostics) = parse_all(json!({
            "When": { "format": "date-time" },
            "Count": { "format": "int64" },
            "Blob": { "format": "something-else" }
        }));
        assert!(diagnostics.is_empty());
        assert_eq!(table["When"].kind, SchemaKind::Primitive(PrimitiveType::String));
        assert_eq!(table["When"].format.as_deref(), Some("date-time"));
        assert_eq!(table["Count"].kind, SchemaKind::Primitive(PrimitiveType::Integer));
        assert!(table["Blob"].is_placeholder());
    }

    #[test]
    fn nullability_dialects_normalize() {
        let (table, _) = parse_all(json!({
            "A": { "type": ["string", "null"] },
            "B": { "type": "string", "x-nullable": true },
            "C": { "oneOf": [{ "$ref": "#/components/schemas/A" }, { "type": "null" }] },
            "D": { "enum": ["a", "b", null] }
        }));
        assert_eq!(table["A"].kind, SchemaKind::Primitive(PrimitiveType::String));
        assert!(table["A"].nullable);
        assert!(table["B"].nullable);
        assert_eq!(table["C"].reference_target(), Some("A"));
        assert!(table["C"].nullable);
        assert_eq!(table["D"].kind, SchemaKind::Enum(PrimitiveType::String));
        assert_eq!(table["D"].enum_values, vec![json!("a"), json!("b")]);
        assert!(table["D"].nullable);
    }

    #[test]
    fn enum_versus_union() {
        let (table, _) = parse_all(json!({
            "Status": { "type": "string", "enum": ["on", "off"] },
            "Mixed": { "enum": ["auto", 1] },
            "Shape": { "oneOf": [{ "$ref": "#/components/schemas/Status" }, { "type": "integer" }] },
            "Fixed": { "const": 3 }
        }));
        assert_eq!(table["Status"].kind, SchemaKind::Enum(PrimitiveType::String));
        assert_eq!(table["Mixed"].kind, SchemaKind::Union);
        assert_eq!(table["Mixed"].variants.len(), 2);
        assert_eq!(table["Shape"].kind, SchemaKind::Union);
        assert_eq!(table["Fixed"].kind, SchemaKind::Enum(PrimitiveType::Integer));
    }

    #[test]
    fn inline_objects_are_promoted_with_context_names() {
        let (table, _) = parse_all(json!({
            "PetOwner": { "type": "object", "properties": { "id": { "type": "integer" } } },
            "Pet": {
                "type": "object",
                "properties": {
                    "owner": { "type": "object", "properties": { "name": { "type": "string" } } },
                    "tags": {
                        "type": "array",
                        "items": { "type": "object", "properties": { "label": { "type": "string" } } }
                    },
                    "kind": { "type": "string", "enum": ["cat", "dog"] }
                }
            }
        }));
        let pet = &table["Pet"];
        assert_eq!(pet.properties["owner"].reference_target(), Some("PetOwner2"));
        let item = pet.properties["tags"].items.as_deref().unwrap();
        assert_eq!(item.reference_target(), Some("PetTagsItem"));
        assert_eq!(pet.properties["kind"].reference_target(), Some("PetKind"));
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            ["PetOwner", "Pet", "PetOwner2", "PetTagsItem", "PetKind"]
        );
        assert_eq!(table["PetOwner2"].name.as_deref(), Some("PetOwner2"));
    }

    #[test]
    fn all_of_merges_properties() {
        let (table, _) = parse_all(json!({
            "Base": {
                "type": "object",
                "required": ["id"],
                "properties": { "id": { "type": "integer" } }
            },
            "Alias": { "allOf": [{ "$ref": "#/components/schemas/Base" }], "nullable": true },
            "Derived": {
                "allOf": [
                    { "$ref": "#/components/schemas/Base" },
                    { "type": "object", "required": ["name"], "properties": { "name": { "type": "string" } } }
                ]
            }
        }));
        assert_eq!(table["Alias"].reference_target(), Some("Base"));
        assert!(table["Alias"].nullable);
        let derived = &table["Derived"];
        assert_eq!(derived.kind, SchemaKind::Object);
        assert_eq!(derived.properties.keys().collect::<Vec<_>>(), ["id", "name"]);
        assert!(derived.is_required("id") && derived.is_required("name"));
    }

    #[test]
    fn all_of_cycle_is_skipped() {
        let (table, _) = parse_all(json!({
            "A": { "allOf": [{ "$ref": "#/components/schemas/B" }, { "properties": { "a": { "type": "string" } } }] },
            "B": { "allOf": [{ "$ref": "#/components/schemas/A" }, { "properties": { "b": { "type": "string" } } }] }
        }));
        assert!(table["A"].properties.contains_key("a"));
        assert!(table["A"].properties.contains_key("b"));
    }

    #[test]
    fn additional_properties_become_value_schema() {
        let (table, _) = parse_all(json!({
            "Labels": { "type": "object", "additionalProperties": { "type": "string" } },
            "Free": { "type": "object", "additionalProperties": true }
        }));
        let value = table["Labels"].additional_properties.as_deref().unwrap();
        assert_eq!(value.kind, SchemaKind::Primitive(PrimitiveType::String));
        assert!(table["Free"].additional_properties.as_deref().unwrap().is_placeholder());
    }

    #[test]
    fn parse_is_deterministic() {
        let doc = json!({
            "A": { "type": "object", "properties": { "b": { "$ref": "#/components/schemas/B" }, "x": { "type": "object", "properties": { "y": { "type": "string" } } } } },
            "B": { "type": "object", "properties": { "a": { "$ref": "#/components/schemas/A" } } }
        });
        assert_eq!(parse_all(doc.clone()), parse_all(doc));
    }
}
