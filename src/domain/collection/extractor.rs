//! Defensive parsing of oracle replies.
//!
//! Oracle output is free text that usually, but not always, contains JSON.
//! Everything here degrades to an empty result instead of erroring: the
//! conversation must continue no matter what came back.

use serde_json::Value;

use crate::domain::schema::SectionSchema;

use super::state::{CollectedData, FieldMap};

/// Extracts the first balanced JSON object from free text.
///
/// Tolerates surrounding commentary and markdown code fences. Returns `None`
/// when no parsable object exists anywhere in the reply.
pub fn first_json_object(text: &str) -> Option<Value> {
    if let Some(inner) = extract_from_code_block(text) {
        if let Some(value) = first_balanced_object(inner) {
            return Some(value);
        }
    }
    first_balanced_object(text)
}

/// Finds the first `{...}` span with balanced braces and parses it.
///
/// Brace counting is string-aware so braces inside JSON strings don't
/// unbalance the scan.
fn first_balanced_object(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return serde_json::from_str(&text[start..=i]).ok();
                }
            }
            _ => {}
        }
    }
    None
}

/// Pulls the body out of a fenced code block, if one is present.
fn extract_from_code_block(text: &str) -> Option<&str> {
    for fence in ["```json\n", "```json\r\n", "```\n", "```\r\n"] {
        if let Some(open) = text.find(fence) {
            let body_start = open + fence.len();
            let body = &text[body_start..];
            if let Some(close) = body.find("```") {
                return Some(&body[..close]);
            }
            return Some(body);
        }
    }
    None
}

/// Keeps only fields the section schema recognizes, keyed by canonical name.
///
/// Unknown keys are dropped; null values are dropped; an alias key lands
/// under the field's canonical name.
pub fn prune_to_section(value: &Value, schema: &SectionSchema) -> FieldMap {
    let mut out = FieldMap::new();
    let Some(object) = value.as_object() else {
        return out;
    };
    for (key, field_value) in object {
        if field_value.is_null() {
            continue;
        }
        if let Some(field) = schema.field(key) {
            out.insert(field.name.clone(), field_value.clone());
        }
    }
    out
}

/// Splits a multi-section extraction into per-section field maps.
///
/// The top level is expected to key sections by name or external alias; any
/// top-level key that instead matches a field of one of the sections is
/// folded into that section, which rescues replies that flattened the
/// structure.
pub fn prune_to_sections(value: &Value, sections: &[&SectionSchema]) -> CollectedData {
    let mut out = CollectedData::new();
    let Some(object) = value.as_object() else {
        return out;
    };
    for (key, section_value) in object {
        if let Some(section) = sections
            .iter()
            .find(|s| s.name == *key || s.external_key() == *key)
        {
            let fields = prune_to_section(section_value, section);
            if !fields.is_empty() {
                out.insert(section.name.clone(), fields);
            }
            continue;
        }
        // Flattened reply: route stray field keys to their owning section.
        if section_value.is_null() {
            continue;
        }
        if let Some((section, field)) = sections
            .iter()
            .find_map(|s| s.field(key).map(|f| (*s, f)))
        {
            out.entry(section.name.clone())
                .or_default()
                .insert(field.name.clone(), section_value.clone());
        }
    }
    out
}
