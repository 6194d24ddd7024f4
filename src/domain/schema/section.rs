//! Section schemas: named, ordered groups of fields.

use serde::{Deserialize, Serialize};

use super::field::FieldSpec;

/// A named, ordered group of fields within a document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSchema {
    /// Canonical snake_case section name.
    pub name: String,
    /// External alias for the section key; camelCase of `name` when absent.
    pub alias: Option<String>,
    /// Ordered field specifications.
    pub fields: Vec<FieldSpec>,
}

impl SectionSchema {
    /// Creates a section schema from ordered fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            fields,
        }
    }

    /// Sets an explicit external alias for the section.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Returns true if any field in this section is required.
    pub fn has_required_fields(&self) -> bool {
        self.fields.iter().any(|f| f.required)
    }

    /// Looks up a field by canonical name or alias.
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.matches_name(key))
    }

    /// Returns the required fields in declared order.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Returns the optional fields in declared order.
    pub fn optional_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !f.required)
    }

    /// Returns the human-readable section title.
    pub fn title(&self) -> String {
        super::titleize(&self.name)
    }

    /// Returns the key this section is exported under.
    pub fn external_key(&self) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| super::camelize(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::FieldKind;

    fn section() -> SectionSchema {
        SectionSchema::new(
            "basic_info",
            vec![
                FieldSpec::required("letter_date", FieldKind::Str).with_alias("letterDate"),
                FieldSpec::required("subject", FieldKind::Str),
                FieldSpec::optional("letter_number", FieldKind::Str).with_alias("letterNumber"),
            ],
        )
    }

    #[test]
    fn has_required_fields_when_any_field_required() {
        assert!(section().has_required_fields());
        let all_optional = SectionSchema::new(
            "misc",
            vec![FieldSpec::optional("notes", FieldKind::Str)],
        );
        assert!(!all_optional.has_required_fields());
    }

    #[test]
    fn field_lookup_accepts_name_or_alias() {
        let s = section();
        assert!(s.field("letter_date").is_some());
        assert!(s.field("letterDate").is_some());
        assert!(s.field("letterhead").is_none());
    }

    #[test]
    fn required_and_optional_iterators_partition_fields() {
        let s = section();
        assert_eq!(s.required_fields().count(), 2);
        assert_eq!(s.optional_fields().count(), 1);
    }

    #[test]
    fn external_key_defaults_to_camel_case() {
        assert_eq!(section().external_key(), "basicInfo");
        let aliased = section().with_alias("basicInformation");
        assert_eq!(aliased.external_key(), "basicInformation");
    }

    #[test]
    fn title_is_human_readable() {
        assert_eq!(section().title(), "Basic Info");
    }
}
