use std::collections::HashSet;

use super::components::Components;
use super::parameter::{Parameter, ParameterOrRef};
use super::request_body::{RequestBody, RequestBodyOrRef};
use super::response::{Response, ResponseOrRef};

const SCHEMA_PREFIXES: [&str; 2] = ["#/components/schemas/", "#/definitions/"];

/// Extract the component name from a schema `$ref` such as
/// `#/components/schemas/Pet`. JSON pointer escapes (`~1`, `~0`) are decoded.
///
/// Returns `None` for external references and pointers into other sections.
pub fn parse_ref_name(ref_path: &str) -> Option<String> {
    let raw = SCHEMA_PREFIXES
        .iter()
        .find_map(|prefix| ref_path.strip_prefix(prefix))?;
    if raw.is_empty() || raw.contains('/') {
        return None;
    }
    Some(raw.replace("~1", "/").replace("~0", "~"))
}

fn section_name<'a>(ref_path: &'a str, section: &str) -> Option<&'a str> {
    ref_path
        .strip_prefix("#/components/")?
        .strip_prefix(section)?
        .strip_prefix('/')
}

/// Follows `$ref` chains for the non-schema component sections.
///
/// Each lookup keeps its own visited set, so `A -> B -> A` ends in `None`
/// instead of looping.
pub struct ComponentLookup<'a> {
    components: Option<&'a Components>,
}

impl<'a> ComponentLookup<'a> {
    pub fn new(components: Option<&'a Components>) -> Self {
        Self { components }
    }

    pub fn parameter<'s>(&'s self, item: &'s ParameterOrRef) -> Option<&'s Parameter> {
        let mut seen = HashSet::new();
        let mut current = item;
        loop {
            match current {
                ParameterOrRef::Parameter(p) => return Some(p),
                ParameterOrRef::Ref { ref_path } => {
                    if !seen.insert(ref_path.as_str()) {
                        return None;
                    }
                    let name = section_name(ref_path, "parameters")?;
                    current = self.components?.parameters.get(name)?;
                }
            }
        }
    }

    pub fn request_body<'s>(&'s self, item: &'s RequestBodyOrRef) -> Option<&'s RequestBody> {
        let mut seen = HashSet::new();
        let mut current = item;
        loop {
            match current {
                RequestBodyOrRef::RequestBody(b) => return Some(b),
                RequestBodyOrRef::Ref { ref_path } => {
                    if !seen.insert(ref_path.as_str()) {
                        return None;
                    }
                    let name = section_name(ref_path, "requestBodies")?;
                    current = self.components?.request_bodies.get(name)?;
                }
            }
        }
    }

    pub fn response<'s>(&'s self, item: &'s ResponseOrRef) -> Option<&'s Response> {
        let mut seen = HashSet::new();
        let mut current = item;
        loop {
            match current {
                ResponseOrRef::Response(r) => return Some(r),
                ResponseOrRef::Ref { ref_path } => {
                    if !seen.insert(ref_path.as_str()) {
                        return None;
                    }
                    let name = section_name(ref_path, "responses")?;
                    current = self.components?.responses.get(name)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_ref_names() {
        assert_eq!(
            parse_ref_name("#/components/schemas/Pet").as_deref(),
            Some("Pet")
        );
        assert_eq!(parse_ref_name("#/definitions/Pet").as_deref(), Some("Pet"));
        assert_eq!(
            parse_ref_name("#/components/schemas/a~1b~0c").as_deref(),
            Some("a/b~c")
        );
        assert_eq!(parse_ref_name("#/components/responses/Pet"), None);
        assert_eq!(parse_ref_name("other.yaml#/Pet"), None);
    }

    #[test]
    fn response_ref_loop_ends() {
        let components: Components = serde_json::from_value(serde_json::json!({
            "responses": {
                "A": { "$ref": "#/components/responses/B" },
                "B": { "$ref": "#/components/responses/A" },
                "Ok": { "description": "fine" }
            }
        }))
        .unwrap();
        let lookup = ComponentLookup::new(Some(&components));
        let looping = ResponseOrRef::Ref {
            ref_path: "#/components/responses/A".into(),
        };
        assert!(lookup.response(&looping).is_none());
        let ok = ResponseOrRef::Ref {
            ref_path: "#/components/responses/Ok".into(),
        };
        assert_eq!(lookup.response(&ok).map(|r| r.description.as_str()), Some("fine"));
    }
}
