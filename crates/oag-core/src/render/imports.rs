use std::collections::{BTreeMap, BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::Serialize;

use crate::transform::name_normalizer::type_name;

use super::module_path::{module_to_file, relative_depth, relative_module};

/// One `from module import symbol [as alias]` a generated file needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImportRequirement {
    pub module: String,
    pub symbol: String,
    pub alias: Option<String>,
}

impl ImportRequirement {
    /// The identifier this import binds in the importing file.
    pub fn bound_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.symbol)
    }
}

/// The top-level directories of the generated tree. Modules under one of
/// them are imported relatively; everything else is an absolute import.
#[derive(Debug, Clone, Default)]
pub struct OutputTree {
    roots: BTreeSet<String>,
}

impl OutputTree {
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Collect the first segment of each planned file path.
    pub fn from_paths<'p>(paths: impl IntoIterator<Item = &'p str>) -> Self {
        Self::new(paths.into_iter().filter_map(|p| p.split('/').next()))
    }

    /// The tree-relative dotted path of `module` if it lives in the tree.
    /// A module spelled with the `output_root` package prefix counts too.
    fn internal_path<'m>(&self, module: &'m str, output_root: &str) -> Option<&'m str> {
        if !output_root.is_empty() {
            if module == output_root {
                return Some("");
            }
            if let Some(rest) = module
                .strip_prefix(output_root)
                .and_then(|r| r.strip_prefix('.'))
            {
                return Some(rest);
            }
        }
        let first = module.split('.').next().unwrap_or(module);
        self.roots.contains(first).then_some(module)
    }
}

#[derive(Debug, Clone, Default)]
struct FileImports {
    requirements: Vec<ImportRequirement>,
    /// Names taken in the file, by imports or by its own declarations.
    bound: HashSet<String>,
}

/// Per-file import bookkeeping for the generated tree.
///
/// Requests against the current file are deduplicated by `(module, symbol)`;
/// a symbol whose name is already bound to something else in the file gets a
/// generated alias instead. Nothing here can fail.
#[derive(Debug, Clone, Default)]
pub struct ImportPlanner {
    tree: OutputTree,
    output_root: String,
    files: IndexMap<String, FileImports>,
    current: String,
}

impl ImportPlanner {
    pub fn new(tree: OutputTree) -> Self {
        Self {
            tree,
            output_root: String::new(),
            files: IndexMap::new(),
            current: String::new(),
        }
    }

    /// Package the generated tree lives in. Modules spelled with this prefix
    /// are recognized as files of the tree when checking for self-imports.
    pub fn with_output_root(mut self, output_root: &str) -> Self {
        self.output_root = output_root.to_string();
        self
    }

    /// Make `path` (e.g. `endpoints/pets`) the file subsequent imports are
    /// registered against.
    pub fn set_current_file(&mut self, path: &str) {
        self.current = path.to_string();
        self.files.entry(self.current.clone()).or_default();
    }

    pub fn current_file(&self) -> &str {
        &self.current
    }

    /// Claim `name` in the current file for something it defines itself, so
    /// imports of the same name are aliased.
    pub fn declare(&mut self, name: &str) {
        self.files
            .entry(self.current.clone())
            .or_default()
            .bound
            .insert(name.to_string());
    }

    /// Register `symbol` from `module` for the current file and return the
    /// name it is bound to there. Importing from the current file itself
    /// registers nothing and returns the symbol.
    pub fn add_import(&mut self, module: &str, symbol: &str, alias: Option<&str>) -> String {
        let internal = self
            .tree
            .internal_path(module, &self.output_root)
            .unwrap_or(module);
        if module_to_file(internal) == self.current {
            return symbol.to_string();
        }

        let file = self.files.entry(self.current.clone()).or_default();
        if let Some(existing) = file
            .requirements
            .iter()
            .find(|r| r.module == module && r.symbol == symbol)
        {
            return existing.bound_name().to_string();
        }

        let wanted = alias.unwrap_or(symbol);
        let bound = if file.bound.contains(wanted) {
            let base = format!("{}{symbol}", type_name(module.rsplit('.').next().unwrap_or(module)));
            let mut candidate = base.clone();
            let mut i = 2;
            while file.bound.contains(&candidate) {
                candidate = format!("{base}{i}");
                i += 1;
            }
            log::debug!(
                "{}: {symbol} from {module} collides with an earlier import, aliased as {candidate}",
                self.current
            );
            candidate
        } else {
            wanted.to_string()
        };

        let requirement = ImportRequirement {
            module: module.to_string(),
            symbol: symbol.to_string(),
            alias: (bound != symbol).then(|| bound.clone()),
        };
        file.bound.insert(bound.clone());
        file.requirements.push(requirement);
        bound
    }

    /// The deduplicated imports registered for `path`, in request order.
    pub fn requirements(&self, path: &str) -> &[ImportRequirement] {
        self.files
            .get(path)
            .map(|f| f.requirements.as_slice())
            .unwrap_or(&[])
    }

    /// Files that have been made current, in order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Import block of the current file.
    pub fn render_imports(&self, output_root: &str) -> String {
        self.render_imports_for(&self.current, output_root)
    }

    /// Import block of `path`: absolute imports sorted by module, a blank
    /// line, then relative imports by depth and then by module suffix.
    pub fn render_imports_for(&self, path: &str, output_root: &str) -> String {
        let mut absolute: BTreeMap<&str, Vec<&ImportRequirement>> = BTreeMap::new();
        let mut relative: BTreeMap<(usize, String), Vec<&ImportRequirement>> = BTreeMap::new();

        for req in self.requirements(path) {
            match self.tree.internal_path(&req.module, output_root) {
                Some(internal) => {
                    if module_to_file(internal) == path {
                        continue;
                    }
                    let module = relative_module(path, internal);
                    let depth = relative_depth(&module);
                    let suffix = module[depth..].to_string();
                    relative.entry((depth, suffix)).or_default().push(req);
                }
                None => absolute.entry(&req.module).or_default().push(req),
            }
        }

        let absolute_lines: Vec<String> = absolute
            .into_iter()
            .map(|(module, reqs)| import_line(module, reqs))
            .collect();
        let relative_lines: Vec<String> = relative
            .into_iter()
            .map(|((depth, suffix), reqs)| {
                import_line(&format!("{}{suffix}", ".".repeat(depth)), reqs)
            })
            .collect();

        let mut blocks = Vec::new();
        if !absolute_lines.is_empty() {
            blocks.push(absolute_lines.join("\n"));
        }
        if !relative_lines.is_empty() {
            blocks.push(relative_lines.join("\n"));
        }
        blocks.join("\n\n")
    }
}

fn import_line(module: &str, mut reqs: Vec<&ImportRequirement>) -> String {
    reqs.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.alias.cmp(&b.alias)));
    let names: Vec<String> = reqs
        .iter()
        .map(|r| match &r.alias {
            Some(alias) => format!("{} as {alias}", r.symbol),
            None => r.symbol.clone(),
        })
        .collect();
    format!("from {module} import {}", names.join(", "))
}
