pub mod components;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod server;
pub mod spec;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Read an already-decoded document tree into the typed document model.
///
/// Decoding from text is left to the caller (`serde_json`, `serde_yaml_ng`).
/// Unknown keys are ignored and a non-3.x `openapi` version is accepted with
/// a warning; only a root that is not a mapping, or a known section with the
/// wrong shape, is an error.
pub fn from_value(value: serde_json::Value) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_value(value)?;
    check_version(&spec);
    Ok(spec)
}

fn check_version(spec: &OpenApiSpec) {
    if !spec.openapi.starts_with("3.") {
        log::warn!(
            "document declares openapi version {:?}; continuing as 3.x",
            spec.openapi
        );
    }
}
