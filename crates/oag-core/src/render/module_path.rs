//! Conversions between planned file paths (`models/pet`) and dotted module
//! paths (`models.pet`), and the relative form of one as seen from the other.

/// `models/pet` → `models.pet`.
pub fn file_to_module(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// `models.pet` → `models/pet`.
pub fn module_to_file(module: &str) -> String {
    module
        .split('.')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Dotted relative module path of `target` as imported from `current_file`.
///
/// One leading dot names the current file's own package; each further dot
/// climbs one directory. `endpoints/pets` importing `models.pet` gives
/// `..models.pet`; `models/pet` importing `models.owner` gives `.owner`.
pub fn relative_module(current_file: &str, target: &str) -> String {
    let current: Vec<&str> = current_file.split('/').filter(|s| !s.is_empty()).collect();
    let current_dir = &current[..current.len().saturating_sub(1)];
    let target: Vec<&str> = target.split('.').filter(|s| !s.is_empty()).collect();

    let shared = current_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let dots = ".".repeat(1 + current_dir.len() - shared);
    format!("{dots}{}", target[shared..].join("."))
}

/// Number of leading dots of a relative module path.
pub fn relative_depth(module: &str) -> usize {
    module.len() - module.trim_start_matches('.').len()
}
