//! Full-record validation at finalize.
//!
//! Collected values stay untyped strings-and-friends until the whole record
//! is assembled; this pass coerces them into the declared field kinds and
//! pinpoints the first offending section/field so the conversation can
//! reopen exactly there.

use serde_json::{Number, Value};
use thiserror::Error;

use crate::domain::schema::{DocumentTypeSchema, FieldKind, FieldSpec, SectionSchema};

use super::completeness::field_value;
use super::state::{CollectedData, FieldMap};

/// Where and why a record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{section}.{field}: {reason}", field = .field.as_deref().unwrap_or("*"))]
pub struct RecordError {
    pub section: String,
    pub field: Option<String>,
    pub reason: String,
}

impl RecordError {
    fn field_error(section: &str, field: &str, reason: impl Into<String>) -> Self {
        Self {
            section: section.to_string(),
            field: Some(field.to_string()),
            reason: reason.into(),
        }
    }
}

/// Coerces one collected value into its declared kind.
///
/// Returns a human-readable reason on failure, phrased so it can be relayed
/// to the user as a re-ask hint.
pub fn coerce_value(field: &FieldSpec, value: &Value) -> Result<Value, String> {
    match &field.kind {
        FieldKind::Str => match value {
            Value::String(s) => Ok(Value::String(s.trim().to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err("expected a short text value".to_string()),
        },
        FieldKind::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => {
                let cleaned = s.trim().replace(',', "");
                cleaned
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("'{}' is not a number", s.trim()))
            }
            _ => Err("expected a number".to_string()),
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "yes" | "y" | "true" => Ok(Value::Bool(true)),
                "no" | "n" | "false" => Ok(Value::Bool(false)),
                other => Err(format!("'{}' is not a yes/no answer (please answer yes or no)", other)),
            },
            _ => Err("please answer yes or no".to_string()),
        },
        FieldKind::Enum(choices) => {
            let Value::String(s) = value else {
                return Err(format!("expected one of: {}", choices.join(", ")));
            };
            let trimmed = s.trim();
            choices
                .iter()
                .find(|c| c.eq_ignore_ascii_case(trimmed))
                .map(|c| Value::String(c.clone()))
                .ok_or_else(|| {
                    format!("'{}' is not one of: {}", trimmed, choices.join(", "))
                })
        }
        FieldKind::StringList => match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => out.push(Value::String(s.trim().to_string())),
                        Value::Number(n) => out.push(Value::String(n.to_string())),
                        _ => return Err("expected a list of short text items".to_string()),
                    }
                }
                Ok(Value::Array(out))
            }
            // A lone value is wrapped rather than rejected.
            Value::String(s) => Ok(Value::Array(vec![Value::String(s.trim().to_string())])),
            Value::Number(n) => Ok(Value::Array(vec![Value::String(n.to_string())])),
            _ => Err("expected a list of short text items".to_string()),
        },
    }
}

/// Validates one section, producing a fully coerced field map.
pub fn validate_section(
    schema: &SectionSchema,
    data: Option<&FieldMap>,
) -> Result<FieldMap, RecordError> {
    let empty = FieldMap::new();
    let data = data.unwrap_or(&empty);
    let mut out = FieldMap::new();
    for field in &schema.fields {
        match field_value(data, field) {
            Some(value) => {
                let coerced = coerce_value(field, value).map_err(|reason| {
                    RecordError::field_error(&schema.name, &field.name, reason)
                })?;
                out.insert(field.name.clone(), coerced);
            }
            None if field.required => {
                return Err(RecordError::field_error(
                    &schema.name,
                    &field.name,
                    "required value is missing",
                ));
            }
            None => {}
        }
    }
    Ok(out)
}

/// Validates the whole record in declared section order.
///
/// Sections with zero required fields are seeded as empty objects when the
/// user skipped them, so the output always carries every section key.
pub fn validate_record(
    doc: &DocumentTypeSchema,
    collected: &CollectedData,
) -> Result<CollectedData, RecordError> {
    let mut out = CollectedData::new();
    for section in &doc.sections {
        let validated = validate_section(section, collected.get(&section.name))?;
        out.insert(section.name.clone(), validated);
    }
    Ok(out)
}
