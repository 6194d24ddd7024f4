//! Document type schemas: ordered collections of sections.

use serde::{Deserialize, Serialize};

use super::section::SectionSchema;

/// A declarative schema for one document type.
///
/// Section order is the declaration order and drives the deterministic
/// question order during collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTypeSchema {
    /// Stable identifier, e.g. `demand_letter`.
    pub id: String,
    /// Ordered section schemas.
    pub sections: Vec<SectionSchema>,
}

impl DocumentTypeSchema {
    /// Creates a document type schema from ordered sections.
    pub fn new(id: impl Into<String>, sections: Vec<SectionSchema>) -> Self {
        Self {
            id: id.into(),
            sections,
        }
    }

    /// Returns the ordered flow steps: `(section name, section schema)` pairs.
    pub fn flow_steps(&self) -> impl Iterator<Item = (&str, &SectionSchema)> {
        self.sections.iter().map(|s| (s.name.as_str(), s))
    }

    /// Looks up a section by canonical name.
    pub fn section(&self, name: &str) -> Option<&SectionSchema> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Returns the first section in declared order.
    pub fn first_section(&self) -> Option<&SectionSchema> {
        self.sections.first()
    }

    /// Returns a human-readable label, e.g. "Demand Letter".
    pub fn label(&self) -> String {
        super::titleize(&self.id)
    }
}
