use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

/// Default bound on schema nesting while parsing.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Top-level project configuration loaded from `.oag.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OagConfig {
    /// Package that contains the generated tree; stripped from internal
    /// module paths when imports are rendered.
    pub package: String,
    pub naming: NamingConfig,
    pub parser: ParserConfig,
    pub envelope: EnvelopeConfig,
    pub layout: LayoutConfig,
}

impl Default for OagConfig {
    fn default() -> Self {
        Self {
            package: "client".to_string(),
            naming: NamingConfig::default(),
            parser: ParserConfig::default(),
            envelope: EnvelopeConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Naming strategy and aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
    /// Map from resolved operation name (operationId or route-derived) to custom alias.
    pub aliases: IndexMap<String, String>,
}

/// How operation names are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    #[default]
    UseOperationId,
    UseRouteBased,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Which response shapes count as an envelope around the real payload.
///
/// A success body is unwrapped when it is an object with exactly one
/// property from `container_fields` and every other property is listed in
/// `metadata_fields`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    pub enabled: bool,
    pub container_fields: Vec<String>,
    pub metadata_fields: Vec<String>,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            container_fields: vec!["data".to_string()],
            metadata_fields: ["meta", "metadata", "links", "pagination"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Where planned files go.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub models_dir: String,
    pub endpoints_dir: String,
    pub split_by: SplitBy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            models_dir: "models".to_string(),
            endpoints_dir: "endpoints".to_string(),
            split_by: SplitBy::Tag,
        }
    }
}

/// How operations are split into endpoint files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitBy {
    /// One file per tag (untagged operations go to `default`).
    #[default]
    Tag,
    /// One file per operation.
    Operation,
    /// One file per first path segment.
    Route,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oag.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OagConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let config: OagConfig = serde_yaml_ng::from_str(&content)?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oag configuration
package: client

naming:
  strategy: use_operation_id  # use_operation_id | use_route_based
  aliases: {}
    # createChatCompletion: chat     # operationId -> custom name

parser:
  max_depth: 100        # nesting bound before a schema becomes untyped

envelope:
  enabled: true
  container_fields: [data]
  metadata_fields: [meta, metadata, links, pagination]

layout:
  models_dir: models
  endpoints_dir: endpoints
  split_by: tag         # tag | operation | route
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OagConfig::default();
        assert_eq!(config.package, "client");
        assert_eq!(config.naming.strategy, NamingStrategy::UseOperationId);
        assert!(config.naming.aliases.is_empty());
        assert_eq!(config.parser.max_depth, 100);
        assert!(config.envelope.enabled);
        assert_eq!(config.envelope.container_fields, ["data"]);
        assert_eq!(config.layout.models_dir, "models");
        assert_eq!(config.layout.split_by, SplitBy::Tag);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
package: petstore
naming:
  strategy: use_route_based
  aliases:
    createChatCompletion: chat
    listModels: models
parser:
  max_depth: 12
envelope:
  enabled: false
  container_fields: [data, result]
layout:
  endpoints_dir: api
  split_by: route
"#;
        let config: OagConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.package, "petstore");
        assert_eq!(config.naming.strategy, NamingStrategy::UseRouteBased);
        assert_eq!(config.naming.aliases.len(), 2);
        assert_eq!(config.naming.aliases["createChatCompletion"], "chat");
        assert_eq!(config.parser.max_depth, 12);
        assert!(!config.envelope.enabled);
        assert_eq!(config.envelope.container_fields, ["data", "result"]);
        // Unset fields inside a section keep their defaults
        assert_eq!(config.envelope.metadata_fields.len(), 4);
        assert_eq!(config.layout.endpoints_dir, "api");
        assert_eq!(config.layout.models_dir, "models");
        assert_eq!(config.layout.split_by, SplitBy::Route);
    }

    #[test]
    fn test_default_content_parses() {
        let config: OagConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.parser.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.envelope.metadata_fields.len(), 4);
    }

    #[test]
    fn test_missing_file_is_none() {
        let loaded = load_config(Path::new("definitely/not/here/.oag.yaml")).unwrap();
        assert!(loaded.is_none());
    }
}
