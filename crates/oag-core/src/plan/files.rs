use indexmap::IndexMap;

use crate::config::OagConfig;
use crate::ir::IrSpec;
use crate::ir::grouping::group_operations;
use crate::render::{ImportPlanner, OutputTree};
use crate::render::module_path::file_to_module;
use crate::resolve::{EnvelopeRule, Primitive, TypeDescriptor, UnifiedTypeService};
use crate::transform::name_normalizer::{member_name, module_name, type_name};

use super::dedup::{dedup_names, dedup_operation_names};
use super::{
    EndpointFile, FieldPlan, FileImports, GenerationPlan, MethodPlan, ModelFile, ParameterPlan,
};

/// Plan every output file for `ir`.
///
/// Types come from one [`UnifiedTypeService`] and method names from
/// [`dedup_operation_names`], computed independently of each other; the
/// import planner then records what each file needs from the others.
pub fn build_plan(ir: &IrSpec, config: &OagConfig) -> GenerationPlan {
    let service = UnifiedTypeService::new(&ir.schemas)
        .with_envelope(EnvelopeRule::from(&config.envelope));
    let layout = &config.layout;

    // Phase 1: File paths for models (one per schema table entry) and endpoint groups
    let model_stems: Vec<String> = ir
        .schemas
        .names()
        .map(|name| module_name(&type_name(name)))
        .collect();
    let model_paths: IndexMap<&str, String> = ir
        .schemas
        .names()
        .zip(dedup_names(model_stems.iter().map(String::as_str)))
        .map(|(name, stem)| (name, format!("{}/{stem}", layout.models_dir)))
        .collect();

    let groups = group_operations(ir, layout.split_by);
    let method_names = dedup_operation_names(ir, &groups);
    let endpoint_paths: Vec<String> =
        dedup_names(groups.iter().map(|g| g.name.module_name.as_str()))
            .into_iter()
            .map(|stem| format!("{}/{stem}", layout.endpoints_dir))
            .collect();

    let tree = OutputTree::from_paths(
        model_paths
            .values()
            .chain(&endpoint_paths)
            .map(String::as_str),
    );
    let mut planner = ImportPlanner::new(tree).with_output_root(&config.package);
    let mut linker = Linker {
        planner: &mut planner,
        model_paths: &model_paths,
    };

    // Phase 2: Models
    let mut models = Vec::new();
    for (name, path) in &model_paths {
        let (Some(schema), Some(definition)) = (ir.schemas.get(name), service.resolve_named(name))
        else {
            continue;
        };
        let declared = type_name(name);
        linker.planner.set_current_file(path);
        linker.planner.declare(&declared);
        let mut bindings = IndexMap::new();
        linker.link(&definition, &mut bindings);

        let fields: Vec<FieldPlan> = schema
            .properties
            .iter()
            .map(|(prop, prop_schema)| {
                let required = schema.is_required(prop);
                let descriptor = service.resolve_schema(prop_schema, required);
                linker.link(&descriptor, &mut bindings);
                FieldPlan {
                    name: prop.clone(),
                    member_name: member_name(prop),
                    required,
                    descriptor,
                }
            })
            .collect();

        models.push(ModelFile {
            path: path.clone(),
            schema_name: name.to_string(),
            type_name: declared,
            definition,
            fields,
            imports: FileImports {
                bindings,
                ..FileImports::default()
            },
        });
    }

    // Phase 3: Endpoint groups
    let mut endpoints = Vec::new();
    for ((group, names), path) in groups.iter().zip(&method_names).zip(&endpoint_paths) {
        linker.planner.set_current_file(path);
        let mut bindings = IndexMap::new();
        let mut methods = Vec::new();

        for (&index, method_name) in group.operation_indices.iter().zip(names) {
            let op = &ir.operations[index];

            let parameters: Vec<ParameterPlan> = op
                .parameters
                .iter()
                .map(|p| {
                    let descriptor = service.resolve_parameter(p);
                    linker.link(&descriptor, &mut bindings);
                    ParameterPlan {
                        name: p.original_name.clone(),
                        member_name: p.name.member_name.clone(),
                        location: p.location,
                        descriptor,
                    }
                })
                .collect();

            let body = op.request_body.as_ref().map(|b| {
                let descriptor = service.resolve_request_body(b);
                linker.link(&descriptor, &mut bindings);
                descriptor
            });

            let (return_type, needs_unwrap) = service.resolve_operation_response(op);
            linker.link(&return_type, &mut bindings);

            methods.push(MethodPlan {
                operation: index,
                operation_id: op.operation_id.clone(),
                method_name: method_name.clone(),
                http_method: op.method,
                path: op.path.clone(),
                parameters,
                body,
                return_type,
                needs_unwrap,
                stream: op.success_response().is_some_and(|r| r.stream),
            });
        }

        endpoints.push(EndpointFile {
            path: path.clone(),
            group: group.name.original.clone(),
            methods,
            imports: FileImports {
                bindings,
                ..FileImports::default()
            },
        });
    }

    // Phase 4: Import blocks, now that every file's requirements are known
    let files = models
        .iter_mut()
        .map(|m| (&m.path, &mut m.imports))
        .chain(endpoints.iter_mut().map(|e| (&e.path, &mut e.imports)));
    for (path, imports) in files {
        imports.requirements = planner.requirements(path).to_vec();
        imports.block = planner.render_imports_for(path, &config.package);
    }

    GenerationPlan {
        package: config.package.clone(),
        models,
        endpoints,
        diagnostics: ir.diagnostics.clone(),
    }
}

/// Registers the imports a descriptor needs in the planner's current file.
struct Linker<'p, 'm> {
    planner: &'p mut ImportPlanner,
    model_paths: &'m IndexMap<&'m str, String>,
}

impl Linker<'_, '_> {
    fn link(&mut self, descriptor: &TypeDescriptor, bindings: &mut IndexMap<String, String>) {
        for name in descriptor.referenced_names() {
            let Some(path) = self.model_paths.get(name) else {
                continue;
            };
            let bound = self
                .planner
                .add_import(&file_to_module(path), &type_name(name), None);
            bindings.entry(name.to_string()).or_insert(bound);
        }
        self.link_primitives(descriptor);
    }

    fn link_primitives(&mut self, descriptor: &TypeDescriptor) {
        match descriptor {
            TypeDescriptor::Primitive(p) => {
                if let Some((module, symbol)) = primitive_import(*p) {
                    self.planner.add_import(module, symbol, None);
                }
            }
            TypeDescriptor::Optional(inner)
            | TypeDescriptor::List(inner)
            | TypeDescriptor::Map(inner) => self.link_primitives(inner),
            TypeDescriptor::Union(variants) => {
                for v in variants {
                    self.link_primitives(v);
                }
            }
            TypeDescriptor::Named(_) | TypeDescriptor::Enum(_) => {}
        }
    }
}

/// Library imports needed to spell a primitive in the generated code.
fn primitive_import(p: Primitive) -> Option<(&'static str, &'static str)> {
    match p {
        Primitive::DateTime => Some(("datetime", "datetime")),
        Primitive::Date => Some(("datetime", "date")),
        Primitive::Uuid => Some(("uuid", "UUID")),
        Primitive::Any => Some(("typing", "Any")),
        _ => None,
    }
}
