//! Field specifications within a section schema.

use serde::{Deserialize, Serialize};

/// The kind of value a field accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "choices")]
pub enum FieldKind {
    /// Free-form text.
    Str,
    /// Numeric value (integer or decimal).
    Number,
    /// Yes/no value.
    Boolean,
    /// One of a fixed set of choices.
    Enum(Vec<String>),
    /// One or more text items.
    StringList,
}

impl FieldKind {
    /// Creates an enum kind from string choices.
    pub fn choices<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum(choices.into_iter().map(Into::into).collect())
    }

    /// Returns a short hint shown to the user when asking for this field.
    pub fn hint(&self) -> Option<String> {
        match self {
            FieldKind::Str | FieldKind::Number => None,
            FieldKind::Boolean => Some("(yes/no)".to_string()),
            FieldKind::StringList => Some("(you can provide one or more items)".to_string()),
            FieldKind::Enum(choices) => {
                let list = choices
                    .iter()
                    .map(|c| format!("'{}'", c))
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("(choose from: {})", list))
            }
        }
    }
}

/// A single named datum within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Canonical snake_case name.
    pub name: String,
    /// External alias (e.g. camelCase key used by the UI), if different.
    pub alias: Option<String>,
    /// Value kind.
    pub kind: FieldKind,
    /// Whether the field must be present for the section to be complete.
    pub required: bool,
    /// Human-readable description used when composing questions.
    pub description: Option<String>,
}

impl FieldSpec {
    /// Creates a required field.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            alias: None,
            kind,
            required: true,
            description: None,
        }
    }

    /// Creates an optional field.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            alias: None,
            kind,
            required: false,
            description: None,
        }
    }

    /// Sets the external alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if `key` is this field's canonical name or alias.
    pub fn matches_name(&self, key: &str) -> bool {
        self.name == key || self.alias.as_deref() == Some(key)
    }

    /// Returns the key this field is exported under (alias, else name).
    pub fn external_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Returns the human-readable title of the field.
    pub fn title(&self) -> String {
        super::titleize(&self.name)
    }
}
