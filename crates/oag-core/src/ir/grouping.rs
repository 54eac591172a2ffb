use indexmap::IndexMap;
use serde::Serialize;

use super::types::{IrSpec, NormalizedName};
use crate::config::SplitBy;
use crate::transform::name_normalizer::normalize_name;

/// Operations that share one endpoint file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationGroup {
    pub name: NormalizedName,
    /// Indices into `IrSpec::operations`, in encounter order.
    pub operation_indices: Vec<usize>,
}

/// Split the operations of `ir` into endpoint files.
pub fn group_operations(ir: &IrSpec, split_by: SplitBy) -> Vec<OperationGroup> {
    match split_by {
        // Tag modules are already grouped (and sorted) by the transform
        SplitBy::Tag => ir
            .modules
            .iter()
            .map(|m| OperationGroup {
                name: m.name.clone(),
                operation_indices: m.operations.clone(),
            })
            .collect(),
        SplitBy::Operation => ir
            .operations
            .iter()
            .enumerate()
            .map(|(i, op)| OperationGroup {
                name: op.name.clone(),
                operation_indices: vec![i],
            })
            .collect(),
        SplitBy::Route => {
            let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
            for (i, op) in ir.operations.iter().enumerate() {
                groups.entry(path_prefix(&op.path)).or_default().push(i);
            }
            groups
                .into_iter()
                .map(|(prefix, indices)| OperationGroup {
                    name: normalize_name(prefix),
                    operation_indices: indices,
                })
                .collect()
        }
    }
}

/// First literal path segment: `/pets/{petId}` → `pets`, `/` → `default`.
fn path_prefix(path: &str) -> &str {
    path.split('/')
        .find(|s| !s.is_empty() && !s.starts_with('{'))
        .unwrap_or("default")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_prefix() {
        assert_eq!(path_prefix("/pets"), "pets");
        assert_eq!(path_prefix("/pets/{petId}"), "pets");
        assert_eq!(path_prefix("/{tenant}/store/inventory"), "store");
        assert_eq!(path_prefix("/"), "default");
    }
}
