use std::collections::HashSet;

use crate::ir::{IrSchema, SchemaKind};

use super::name_normalizer::type_name;

/// Whether an inline schema gets its own entry in the schema table: objects
/// that declare properties, and enums. Everything else stays anonymous.
pub fn is_promotable(schema: &IrSchema) -> bool {
    match schema.kind {
        SchemaKind::Object => !schema.properties.is_empty(),
        SchemaKind::Enum(_) => true,
        _ => false,
    }
}

/// Names already claimed in the schema table (component names as written
/// and as type names) and the synthesized names handed out so far.
#[derive(Debug, Default)]
pub struct UsedNames(HashSet<String>);

impl UsedNames {
    pub fn reserve(&mut self, name: &str) {
        self.0.insert(name.to_string());
        self.0.insert(type_name(name));
    }

    /// Generate a unique type name, appending numeric suffixes if needed.
    pub fn unique_name(&mut self, base: &str) -> String {
        let base = type_name(base);
        if self.0.insert(base.clone()) {
            return base;
        }
        let mut i = 2;
        loop {
            let candidate = format!("{base}{i}");
            if self.0.insert(candidate.clone()) {
                return candidate;
            }
            i += 1;
        }
    }
}
