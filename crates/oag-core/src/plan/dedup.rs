use std::collections::{HashMap, HashSet};

use crate::ir::IrSpec;
use crate::ir::grouping::OperationGroup;

/// Make `names` collision-free in encounter order: the first occurrence
/// keeps its name, later ones get `_2`, `_3`, ... (skipping any candidate
/// that is itself already taken).
pub fn dedup_names<'n>(names: impl IntoIterator<Item = &'n str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();

    for name in names {
        if taken.insert(name.to_string()) {
            out.push(name.to_string());
            continue;
        }
        let suffix = next_suffix.entry(name.to_string()).or_insert(2);
        let unique = loop {
            let candidate = format!("{name}_{suffix}");
            *suffix += 1;
            if taken.insert(candidate.clone()) {
                break candidate;
            }
        };
        log::debug!("{name} is already taken, renamed to {unique}");
        out.push(unique);
    }
    out
}

/// Final method names for every operation, per group.
///
/// The result is aligned with `groups`: entry `[g][i]` names the operation
/// `groups[g].operation_indices[i]`. Names are the operations' sanitized
/// member names, deduplicated within each group only.
pub fn dedup_operation_names(ir: &IrSpec, groups: &[OperationGroup]) -> Vec<Vec<String>> {
    groups
        .iter()
        .map(|group| {
            dedup_names(
                group
                    .operation_indices
                    .iter()
                    .map(|&i| ir.operations[i].name.member_name.as_str()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_keeps_bare_name() {
        assert_eq!(
            dedup_names(["get_feedback", "get_feedback", "list", "get_feedback"]),
            ["get_feedback", "get_feedback_2", "list", "get_feedback_3"]
        );
    }

    #[test]
    fn skips_taken_candidates() {
        assert_eq!(
            dedup_names(["a_2", "a", "a"]),
            ["a_2", "a", "a_3"]
        );
    }
}
