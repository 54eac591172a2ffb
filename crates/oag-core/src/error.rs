use thiserror::Error;

/// Failure to turn raw input into the typed document model.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid document: {0}")]
    Document(#[from] serde_json::Error),
}

/// A problem with a single schema node. These never abort a build; they are
/// collected on the IR and the offending node becomes an `Any` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
pub enum SchemaIssue {
    #[error("schema nesting exceeds the maximum depth of {max_depth}")]
    CycleDepthExceeded { max_depth: usize },

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("schema node is not an object")]
    Malformed,
}

/// A [`SchemaIssue`] together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    pub location: String,
    pub issue: SchemaIssue,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.issue)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}
