//! Re-expresses collected data under external (aliased) keys.
//!
//! The conversation works in canonical snake_case names; UI form pre-fill
//! and document generation expect each field under its external alias.

use serde_json::{Map, Value};

use crate::domain::schema::DocumentTypeSchema;

use super::state::CollectedData;

/// Converts collected data to a JSON object keyed by external names.
///
/// Sections and fields appear in declared schema order; sections with no
/// data are omitted. Unrecognized keys pass through unchanged so nothing
/// collected is silently lost.
pub fn to_aliased(doc: &DocumentTypeSchema, collected: &CollectedData) -> Value {
    let mut out = Map::new();
    for section in &doc.sections {
        let Some(data) = collected.get(&section.name) else {
            continue;
        };
        let mut fields = Map::new();
        for spec in &section.fields {
            if let Some(value) = data.get(&spec.name) {
                fields.insert(spec.external_key().to_string(), value.clone());
            }
        }
        for (key, value) in data {
            if section.field(key).is_none() {
                fields.insert(key.clone(), value.clone());
            }
        }
        out.insert(section.external_key(), Value::Object(fields));
    }
    Value::Object(out)
}
