//! Declarative document schemas and the registry that serves them.

mod catalog;
mod document;
mod field;
mod registry;
mod section;

pub use catalog::{builtin_registry, default_registry};
pub use document::DocumentTypeSchema;
pub use field::{FieldKind, FieldSpec};
pub use registry::SchemaRegistry;
pub use section::SectionSchema;

/// Converts a snake_case identifier to a Title Case display name.
pub fn titleize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts a snake_case identifier to camelCase.
pub fn camelize(name: &str) -> String {
    let mut parts = name.split('_').filter(|p| !p.is_empty());
    let mut out = String::new();
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
