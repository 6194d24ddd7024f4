//! The schema registry: an immutable catalog of document types.
//!
//! Built once at startup and passed by reference to the collection engine.
//! Replaces ad-hoc lookup dictionaries with a statically inspectable table.

use std::collections::BTreeMap;

use crate::domain::foundation::SchemaError;

use super::document::DocumentTypeSchema;
use super::section::SectionSchema;

/// Catalog of document type schemas plus keyword triggers for detection.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: BTreeMap<String, DocumentTypeSchema>,
    keywords: Vec<(String, Vec<String>)>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document type schema.
    ///
    /// Fails if the id is already registered; the registry is meant to be
    /// assembled once at startup, never mutated afterwards.
    pub fn register(&mut self, schema: DocumentTypeSchema) -> Result<(), SchemaError> {
        if self.types.contains_key(&schema.id) {
            return Err(SchemaError::DuplicateDocumentType(schema.id.clone()));
        }
        self.types.insert(schema.id.clone(), schema);
        Ok(())
    }

    /// Associates trigger keywords with a document type for intent detection.
    pub fn register_keywords<I, S>(&mut self, doc_type: impl Into<String>, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.push((
            doc_type.into(),
            keywords.into_iter().map(Into::into).collect(),
        ));
    }

    /// Looks up a document type schema.
    pub fn get(&self, id: &str) -> Result<&DocumentTypeSchema, SchemaError> {
        self.types
            .get(id)
            .ok_or_else(|| SchemaError::UnknownDocumentType(id.to_string()))
    }

    /// Returns the ordered flow steps for a document type.
    pub fn flow_steps(&self, id: &str) -> Result<Vec<(&str, &SectionSchema)>, SchemaError> {
        Ok(self.get(id)?.flow_steps().collect())
    }

    /// Returns the registered document type ids.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Detects the requested document type from free text using keywords.
    pub fn detect_document_type(&self, message: &str) -> Option<&str> {
        let lower = message.to_lowercase();
        for (doc_type, keywords) in &self.keywords {
            if keywords.iter().any(|kw| lower.contains(kw.as_str())) {
                return Some(doc_type.as_str());
            }
        }
        None
    }
}
