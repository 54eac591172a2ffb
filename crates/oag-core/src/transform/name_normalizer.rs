use heck::{ToPascalCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Words that cannot be used as identifiers in the generated code.
pub const RESERVED_WORDS: &[&str] = &[
    "false", "none", "true", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "match", "nonlocal", "not", "or", "pass", "raise",
    "return", "try", "while", "with", "yield",
];

/// Create a `NormalizedName` from an arbitrary string, computing all three
/// identifier forms.
pub fn normalize_name(name: &str) -> NormalizedName {
    NormalizedName {
        original: name.to_string(),
        type_name: type_name(name),
        member_name: member_name(name),
        module_name: module_name(name),
    }
}

/// PascalCase type identifier. A leading digit gets a `_` prefix; a name
/// that collides with a reserved word (case-insensitively) gets a `_` suffix.
pub fn type_name(name: &str) -> String {
    let cased = sanitize_identifier(name).to_pascal_case();
    avoid_collisions(cased, |s| is_reserved(&s.to_lowercase()))
}

/// snake_case identifier for functions, methods, fields and parameters.
pub fn member_name(name: &str) -> String {
    let cased = sanitize_identifier(name).to_snake_case();
    avoid_collisions(cased, is_reserved)
}

/// snake_case segment of a module path (one generated file).
pub fn module_name(name: &str) -> String {
    member_name(name)
}

fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

fn avoid_collisions(mut ident: String, reserved: impl Fn(&str) -> bool) -> String {
    if ident.is_empty() {
        return "unnamed".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if reserved(&ident) {
        ident.push('_');
    }
    ident
}

/// Derive a camelCase operation name from HTTP method + path.
///
/// Examples:
/// - `GET /users` → `listUsers`
/// - `POST /users` → `createUsers`
/// - `GET /users/{userId}` → `getUser`
/// - `DELETE /users/{userId}` → `deleteUser`
/// - `GET /users/{userId}/messages` → `listUsersMessages`
pub fn route_to_name(method: &str, path: &str) -> String {
    let mut resource_parts: Vec<&str> = Vec::new();
    let mut ends_with_param = false;

    for seg in path.split('/').filter(|s| !s.is_empty()) {
        if seg.starts_with('{') && seg.ends_with('}') {
            ends_with_param = true;
        } else {
            resource_parts.push(seg);
            ends_with_param = false;
        }
    }

    let method_lower = method.to_lowercase();
    let prefix = match method_lower.as_str() {
        "get" if ends_with_param => "get",
        "get" => "list",
        "post" => "create",
        "put" => "update",
        other => other,
    };

    let last = resource_parts.len().saturating_sub(1);
    let resource: String = resource_parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i == last && ends_with_param {
                singularize(part).to_pascal_case()
            } else {
                part.to_pascal_case()
            }
        })
        .collect();

    format!("{prefix}{resource}")
}

/// Naive singularization.
fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies").filter(|s| !s.is_empty()) {
        format!("{stem}y")
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Replace runs of non-alphanumeric characters with a single `_`.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    result
}
