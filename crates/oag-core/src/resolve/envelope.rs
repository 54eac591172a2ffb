use std::collections::HashSet;

use crate::config::EnvelopeConfig;
use crate::ir::{IrSchema, SchemaKind, SchemaTable};

/// Decides whether a success body is a wrapper around the real payload.
#[derive(Debug, Clone)]
pub struct EnvelopeRule {
    pub enabled: bool,
    pub container_fields: Vec<String>,
    pub metadata_fields: Vec<String>,
}

impl Default for EnvelopeRule {
    fn default() -> Self {
        Self::from(&EnvelopeConfig::default())
    }
}

impl From<&EnvelopeConfig> for EnvelopeRule {
    fn from(config: &EnvelopeConfig) -> Self {
        Self {
            enabled: config.enabled,
            container_fields: config.container_fields.clone(),
            metadata_fields: config.metadata_fields.clone(),
        }
    }
}

impl EnvelopeRule {
    /// The payload schema inside `schema`, if `schema` (after following
    /// references) is an object with exactly one container field and no
    /// properties other than metadata fields.
    pub fn payload<'s>(&self, table: &'s SchemaTable, schema: &'s IrSchema) -> Option<&'s IrSchema> {
        if !self.enabled {
            return None;
        }
        let object = follow_references(table, schema)?;
        if object.kind != SchemaKind::Object {
            return None;
        }

        let mut containers = object
            .properties
            .iter()
            .filter(|(name, _)| self.container_fields.contains(*name));
        let (container, payload) = containers.next()?;
        if containers.next().is_some() {
            return None;
        }

        let only_metadata = object
            .properties
            .keys()
            .all(|name| name == container || self.metadata_fields.contains(name));
        only_metadata.then_some(payload)
    }
}

/// Follow reference hops to the first non-reference node. `None` for a
/// missing target or a reference loop.
fn follow_references<'s>(table: &'s SchemaTable, schema: &'s IrSchema) -> Option<&'s IrSchema> {
    let mut seen = HashSet::new();
    let mut current = schema;
    while let SchemaKind::Reference(name) = &current.kind {
        if !seen.insert(name.as_str()) {
            return None;
        }
        current = table.get(name)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PrimitiveType;

    fn object(fields: &[&str]) -> IrSchema {
        let mut o = IrSchema::new(SchemaKind::Object);
        for f in fields {
            o.properties
                .insert(f.to_string(), IrSchema::primitive(PrimitiveType::String));
        }
        o
    }

    #[test]
    fn data_with_metadata_is_envelope() {
        let table = SchemaTable::default();
        let rule = EnvelopeRule::default();
        assert!(rule.payload(&table, &object(&["data"])).is_some());
        assert!(rule.payload(&table, &object(&["data", "meta", "links"])).is_some());
    }

    #[test]
    fn other_siblings_disqualify() {
        let table = SchemaTable::default();
        let rule = EnvelopeRule::default();
        assert!(rule.payload(&table, &object(&["data", "id"])).is_none());
        assert!(rule.payload(&table, &object(&["meta"])).is_none());
        assert!(rule.payload(&table, &IrSchema::primitive(PrimitiveType::String)).is_none());
    }

    #[test]
    fn configurable_container_fields() {
        let table = SchemaTable::default();
        let rule = EnvelopeRule {
            container_fields: vec!["data".into(), "result".into()],
            ..EnvelopeRule::default()
        };
        assert!(rule.payload(&table, &object(&["result", "meta"])).is_some());
        assert!(rule.payload(&table, &object(&["data", "result"])).is_none());
        let off = EnvelopeRule {
            enabled: false,
            ..EnvelopeRule::default()
        };
        assert!(off.payload(&table, &object(&["data"])).is_none());
    }

    #[test]
    fn follows_references_and_stops_on_loops() {
        let mut wrapper = object(&["data", "meta"]);
        wrapper.name = Some("Wrapper".into());
        let table: SchemaTable = [
            ("Wrapper".to_string(), wrapper),
            ("Loop".to_string(), IrSchema::reference("Loop")),
        ]
        .into_iter()
        .collect();
        let rule = EnvelopeRule::default();
        assert!(rule.payload(&table, &IrSchema::reference("Wrapper")).is_some());
        assert!(rule.payload(&table, &IrSchema::reference("Loop")).is_none());
        assert!(rule.payload(&table, &IrSchema::reference("Missing")).is_none());
    }
}
