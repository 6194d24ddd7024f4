//! Prompt-backed document generator.
//!
//! Renders the validated record into a structured drafting prompt and asks
//! the oracle for the final document text.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::domain::schema::SchemaRegistry;
use crate::ports::{DocumentError, DocumentGenerator, Oracle};

const DRAFTER_PERSONA: &str = "You are a legal document drafting expert. \
Produce complete, professional documents in formal legal language.";

/// Generator that delegates document prose to the oracle.
pub struct PromptDocumentGenerator {
    oracle: Arc<dyn Oracle>,
    registry: Arc<SchemaRegistry>,
}

impl PromptDocumentGenerator {
    pub fn new(oracle: Arc<dyn Oracle>, registry: Arc<SchemaRegistry>) -> Self {
        Self { oracle, registry }
    }

    /// Renders the alias-keyed record as a structured drafting brief.
    fn drafting_prompt(&self, doc_type_id: &str, record: &Value) -> Result<String, DocumentError> {
        let schema = self
            .registry
            .get(doc_type_id)
            .map_err(|_| DocumentError::UnknownDocumentType(doc_type_id.to_string()))?;

        let mut brief = format!(
            "Please generate a formal and professional {} based on the structured \
             information below. Incorporate every provided detail in a clear, logical \
             and legally sound manner.\n",
            schema.label()
        );
        for section in &schema.sections {
            let Some(fields) = record.get(section.external_key()) else {
                continue;
            };
            let Some(fields) = fields.as_object() else {
                continue;
            };
            if fields.is_empty() {
                continue;
            }
            brief.push_str(&format!("\n---\n**{}**\n", section.title().to_uppercase()));
            for spec in &section.fields {
                if let Some(value) = fields.get(spec.external_key()) {
                    brief.push_str(&format!("- {}: {}\n", spec.title(), render_value(value)));
                }
            }
        }
        brief.push_str(
            "\nIMPORTANT NOTE: Just return the document text without any additional \
             explanations or commentary.",
        );
        Ok(brief)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl DocumentGenerator for PromptDocumentGenerator {
    async fn generate(&self, doc_type_id: &str, record: &Value) -> Result<String, DocumentError> {
        let prompt = self.drafting_prompt(doc_type_id, record)?;
        info!(doc_type = doc_type_id, "generating document");
        self.oracle
            .call(&prompt, DRAFTER_PERSONA)
            .await
            .map_err(|e| DocumentError::GenerationFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::ScriptedOracle;
    use crate::domain::schema::default_registry;
    use serde_json::json;

    fn generator_with(oracle: ScriptedOracle) -> PromptDocumentGenerator {
        PromptDocumentGenerator::new(Arc::new(oracle), default_registry())
    }

    #[tokio::test]
    async fn prompt_carries_section_titles_and_values() {
        let oracle = ScriptedOracle::with_replies(["DEMAND LETTER TEXT"]);
        let record = json!({
            "basicInfo": {"letterDate": "2025-01-10", "subject": "unpaid invoice"},
            "senderInfo": {"name": "John Doe"},
        });
        let generator = generator_with(oracle);
        let text = generator.generate("demand_letter", &record).await.unwrap();
        assert_eq!(text, "DEMAND LETTER TEXT");

        let prompt = generator
            .drafting_prompt("demand_letter", &record)
            .unwrap();
        assert!(prompt.contains("**BASIC INFO**"));
        assert!(prompt.contains("- Letter Date: 2025-01-10"));
        assert!(prompt.contains("- Name: John Doe"));
    }

    #[tokio::test]
    async fn unknown_type_is_rejected_before_calling_the_oracle() {
        let oracle = ScriptedOracle::new();
        let generator = generator_with(oracle);
        let err = generator
            .generate("lease_agreement", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnknownDocumentType(_)));
    }

    #[test]
    fn booleans_and_lists_render_readably() {
        assert_eq!(render_value(&json!(true)), "Yes");
        assert_eq!(render_value(&json!(["a", "b"])), "a, b");
        assert_eq!(render_value(&json!(12500.5)), "12500.5");
    }
}
