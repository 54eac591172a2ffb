//! Per-file generation plans: resolved types, final member names and
//! import blocks for every file an emitter will write.

pub mod dedup;
pub mod files;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Diagnostic;
use crate::ir::{HttpMethod, IrParameterLocation};
use crate::render::ImportRequirement;
use crate::resolve::TypeDescriptor;

pub use dedup::{dedup_names, dedup_operation_names};
pub use files::build_plan;

/// Everything an emitter needs, file by file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationPlan {
    /// Package the generated tree is imported as.
    pub package: String,
    pub models: Vec<ModelFile>,
    pub endpoints: Vec<EndpointFile>,
    /// Parser diagnostics carried over from the IR.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationPlan {
    pub fn model(&self, schema_name: &str) -> Option<&ModelFile> {
        self.models.iter().find(|m| m.schema_name == schema_name)
    }

    pub fn endpoint(&self, path: &str) -> Option<&EndpointFile> {
        self.endpoints.iter().find(|e| e.path == path)
    }
}

/// Imports of one planned file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileImports {
    pub requirements: Vec<ImportRequirement>,
    /// Schema table name → identifier bound for it in this file.
    pub bindings: IndexMap<String, String>,
    /// Rendered import block.
    pub block: String,
}

/// One schema table entry and the file that declares it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFile {
    /// File path relative to the output root, without extension.
    pub path: String,
    pub schema_name: String,
    pub type_name: String,
    pub definition: TypeDescriptor,
    pub fields: Vec<FieldPlan>,
    pub imports: FileImports,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPlan {
    pub name: String,
    pub member_name: String,
    pub required: bool,
    pub descriptor: TypeDescriptor,
}

/// One group of operations and the file that exposes them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointFile {
    pub path: String,
    pub group: String,
    pub methods: Vec<MethodPlan>,
    pub imports: FileImports,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodPlan {
    /// Index into `IrSpec::operations`.
    pub operation: usize,
    pub operation_id: String,
    /// Member name, unique within the file.
    pub method_name: String,
    pub http_method: HttpMethod,
    pub path: String,
    pub parameters: Vec<ParameterPlan>,
    pub body: Option<TypeDescriptor>,
    pub return_type: TypeDescriptor,
    pub needs_unwrap: bool,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterPlan {
    pub name: String,
    pub member_name: String,
    pub location: IrParameterLocation,
    pub descriptor: TypeDescriptor,
}
