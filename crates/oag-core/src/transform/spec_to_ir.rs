use std::collections::HashMap;

use heck::ToPascalCase;
use indexmap::IndexMap;

use crate::config::{DEFAULT_MAX_DEPTH, NamingStrategy, OagConfig};
use crate::error::SchemaIssue;
use crate::ir::*;
use crate::parse::media_type::{EVENT_STREAM, JSON, select_media_type};
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{ParameterLocation, ParameterOrRef};
use crate::parse::ref_resolve::ComponentLookup;
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::ResponseOrRef;
use crate::parse::spec::OpenApiSpec;

use super::name_normalizer::{normalize_name, route_to_name};
use super::schema_parser::SchemaParser;

/// Options controlling how the transform phase names operations and how
/// deep it follows schemas.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub naming_strategy: NamingStrategy,
    pub aliases: IndexMap<String, String>,
    pub max_depth: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            naming_strategy: NamingStrategy::default(),
            aliases: IndexMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl From<&OagConfig> for TransformOptions {
    fn from(config: &OagConfig) -> Self {
        Self {
            naming_strategy: config.naming.strategy,
            aliases: config.naming.aliases.clone(),
            max_depth: config.parser.max_depth,
        }
    }
}

/// Transform a parsed OpenAPI document into the IR.
pub fn transform(spec: &OpenApiSpec) -> IrSpec {
    transform_with_options(spec, &TransformOptions::default())
}

/// Transform with explicit options. Never fails: problems with individual
/// schemas or references end up in `IrSpec::diagnostics`.
pub fn transform_with_options(spec: &OpenApiSpec, options: &TransformOptions) -> IrSpec {
    let components = spec.components.as_ref();
    let mut parser = SchemaParser::new(components.map(|c| &c.schemas), options.max_depth);

    // Phase 1: Component schemas, in document order
    parser.parse_components();

    // Phase 2: Operations (inline schemas are promoted into the same table)
    let mut builder = OperationBuilder {
        parser: &mut parser,
        lookup: ComponentLookup::new(components),
        options,
    };
    let mut operations = Vec::new();
    for (path, path_item) in &spec.paths {
        builder.collect_operations(path, path_item, &mut operations);
    }

    // Phase 3: Group operations into modules by tag
    let modules = group_into_modules(&operations);

    let (schemas, diagnostics) = parser.finish();

    let info = IrInfo {
        title: spec.info.title.clone(),
        description: spec.info.description.clone(),
        version: spec.info.version.clone(),
    };

    let servers = spec
        .servers
        .iter()
        .map(|s| IrServer {
            url: s.url.clone(),
            description: s.description.clone(),
        })
        .collect();

    IrSpec {
        info,
        servers,
        schemas,
        operations,
        modules,
        diagnostics,
    }
}

struct OperationBuilder<'p, 'a> {
    parser: &'p mut SchemaParser<'a>,
    lookup: ComponentLookup<'a>,
    options: &'p TransformOptions,
}

impl OperationBuilder<'_, '_> {
    fn collect_operations(&mut self, path: &str, item: &PathItem, out: &mut Vec<IrOperation>) {
        let methods = [
            (HttpMethod::Get, &item.get),
            (HttpMethod::Post, &item.post),
            (HttpMethod::Put, &item.put),
            (HttpMethod::Delete, &item.delete),
            (HttpMethod::Patch, &item.patch),
            (HttpMethod::Options, &item.options),
            (HttpMethod::Head, &item.head),
            (HttpMethod::Trace, &item.trace),
        ];
        for (method, op) in methods {
            if let Some(op) = op {
                let ir_op = self.build_operation(method, path, op, &item.parameters);
                out.push(ir_op);
            }
        }
    }

    fn build_operation(
        &mut self,
        method: HttpMethod,
        path: &str,
        op: &Operation,
        path_params: &[ParameterOrRef],
    ) -> IrOperation {
        let route_name = route_to_name(method.as_str(), path);
        let operation_id = op.operation_id.clone().unwrap_or_else(|| route_name.clone());

        // Derive the raw operation name based on naming strategy
        let raw_name = match self.options.naming_strategy {
            NamingStrategy::UseOperationId => operation_id.clone(),
            NamingStrategy::UseRouteBased => route_name,
        };

        // Apply aliases: if the raw name matches an alias key, use the alias value
        let name = normalize_name(self.options.aliases.get(&raw_name).unwrap_or(&raw_name));
        let ctx = name.type_name.clone();

        // Operation-level parameters override path-level ones with the same name and location
        let mut parameters = self.resolve_parameters(&ctx, path_params);
        for param in self.resolve_parameters(&ctx, &op.parameters) {
            match parameters
                .iter_mut()
                .find(|p| p.original_name == param.original_name && p.location == param.location)
            {
                Some(existing) => *existing = param,
                None => parameters.push(param),
            }
        }

        let request_body = op
            .request_body
            .as_ref()
            .and_then(|body| self.resolve_request_body(&ctx, body));

        let responses = self.resolve_responses(&ctx, &op.responses);

        IrOperation {
            operation_id,
            name,
            method,
            path: path.to_string(),
            summary: op.summary.clone(),
            description: op.description.clone(),
            tags: op.tags.clone(),
            parameters,
            request_body,
            responses,
            deprecated: op.deprecated.unwrap_or(false),
        }
    }

    fn resolve_parameters(&mut self, ctx: &str, params: &[ParameterOrRef]) -> Vec<IrParameter> {
        let mut out = Vec::new();
        for item in params {
            let Some(param) = self.lookup.parameter(item) else {
                self.unresolved(ctx, item_ref(item));
                continue;
            };
            let location = match param.location {
                ParameterLocation::Path => IrParameterLocation::Path,
                ParameterLocation::Query => IrParameterLocation::Query,
                ParameterLocation::Header => IrParameterLocation::Header,
                ParameterLocation::Cookie => IrParameterLocation::Cookie,
            };
            let schema = match &param.schema {
                Some(node) => {
                    let param_ctx = format!("{ctx}{}", param.name.to_pascal_case());
                    self.parser.parse_nested(&param_ctx, node)
                }
                None => IrSchema::primitive(PrimitiveType::Any),
            };
            out.push(IrParameter {
                name: normalize_name(&param.name),
                original_name: param.name.clone(),
                location,
                schema,
                // Path parameters are always required
                required: param.required || location == IrParameterLocation::Path,
                description: param.description.clone(),
            });
        }
        out
    }

    fn resolve_request_body(&mut self, ctx: &str, body: &RequestBodyOrRef) -> Option<IrRequestBody> {
        let Some(rb) = self.lookup.request_body(body) else {
            if let RequestBodyOrRef::Ref { ref_path } = body {
                self.unresolved(ctx, Some(ref_path));
            }
            return None;
        };

        // Prefer application/json, fall back to first content type
        let (content_type, mt) = rb
            .content
            .get_key_value(JSON)
            .or_else(|| rb.content.first())?;

        let schema = match &mt.schema {
            Some(node) => self.parser.parse_nested(&format!("{ctx}Body"), node),
            None => IrSchema::primitive(PrimitiveType::Any),
        };

        let encoding = mt
            .encoding
            .iter()
            .map(|(field_name, enc)| IrFieldEncoding {
                field_name: field_name.clone(),
                content_type: enc.content_type.clone(),
            })
            .collect();

        Some(IrRequestBody {
            schema,
            required: rb.required,
            content_type: content_type.clone(),
            description: rb.description.clone(),
            encoding,
        })
    }

    fn resolve_responses(
        &mut self,
        ctx: &str,
        responses: &IndexMap<String, ResponseOrRef>,
    ) -> Vec<IrResponse> {
        let success = select_success(responses.keys().map(String::as_str));
        let mut out = Vec::new();

        for (i, (status, item)) in responses.iter().enumerate() {
            let Some(response) = self.lookup.response(item) else {
                if let ResponseOrRef::Ref { ref_path } = item {
                    self.unresolved(ctx, Some(ref_path));
                }
                continue;
            };

            let response_ctx = if Some(i) == success {
                format!("{ctx}Response")
            } else {
                format!("{ctx}{}Response", status.to_pascal_case())
            };

            let selected = select_media_type(&response.content);
            let stream = selected.is_some_and(|(ct, _)| ct == EVENT_STREAM);
            let schema = selected.and_then(|(_, mt)| {
                let node = if stream {
                    mt.item_schema.as_ref().or(mt.schema.as_ref())
                } else {
                    mt.schema.as_ref()
                };
                node.map(|n| self.parser.parse_nested(&response_ctx, n))
            });

            out.push(IrResponse {
                status_code: status.clone(),
                description: Some(response.description.clone()).filter(|d| !d.is_empty()),
                content_type: selected.map(|(ct, _)| ct.clone()),
                schema,
                stream,
            });
        }
        out
    }

    fn unresolved(&mut self, ctx: &str, ref_path: Option<&String>) {
        if let Some(ref_path) = ref_path {
            self.parser
                .record(ctx, SchemaIssue::UnresolvedReference(ref_path.clone()));
        }
    }
}

fn item_ref(item: &ParameterOrRef) -> Option<&String> {
    match item {
        ParameterOrRef::Ref { ref_path } => Some(ref_path),
        ParameterOrRef::Parameter(_) => None,
    }
}

fn group_into_modules(operations: &[IrOperation]) -> Vec<IrModule> {
    let mut tag_groups: HashMap<String, Vec<usize>> = HashMap::new();

    for (i, op) in operations.iter().enumerate() {
        if op.tags.is_empty() {
            tag_groups.entry("default".to_string()).or_default().push(i);
        } else {
            for tag in &op.tags {
                tag_groups.entry(tag.clone()).or_default().push(i);
            }
        }
    }

    let mut modules: Vec<IrModule> = tag_groups
        .into_iter()
        .map(|(name, ops)| IrModule {
            name: normalize_name(&name),
            operations: ops,
        })
        .collect();

    modules.sort_by(|a, b| a.name.original.cmp(&b.name.original));
    modules
}
