use std::fmt;

use serde::Serialize;

use super::operations::IrOperation;
use super::schemas::SchemaTable;
use crate::error::Diagnostic;

/// The intermediate representation of an OpenAPI document. Owns every
/// named schema; everything downstream borrows from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrSpec {
    pub info: IrInfo,
    pub servers: Vec<IrServer>,
    pub schemas: SchemaTable,
    pub operations: Vec<IrOperation>,
    pub modules: Vec<IrModule>,
    /// Problems found while parsing, in encounter order.
    pub diagnostics: Vec<Diagnostic>,
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

/// A server URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrServer {
    pub url: String,
    pub description: Option<String>,
}

/// A module groups operations by tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrModule {
    pub name: NormalizedName,
    pub operations: Vec<usize>, // indices into IrSpec.operations
}

/// A name with its sanitized identifier forms pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedName {
    pub original: String,
    /// PascalCase class/type identifier.
    pub type_name: String,
    /// snake_case function/field identifier.
    pub member_name: String,
    /// snake_case module path segment.
    pub module_name: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
