//! Oracle gateway: the never-failing facade over the oracle port.
//!
//! Every capability here degrades to a safe default on any oracle error or
//! unparsable reply. Errors stop at this layer so the engine can always
//! finish the turn.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::collection::extractor::{first_json_object, prune_to_section, prune_to_sections};
use crate::domain::collection::interrupt::{self, InterruptClassification, InterruptKind};
use crate::domain::collection::{CollectedData, FieldMap};
use crate::domain::schema::{SchemaRegistry, SectionSchema};
use crate::ports::Oracle;

use super::prompts;

/// What an idle-state message is asking for.
///
/// A message can request a document, ask a general question, or both at
/// once ("What is a demand letter? I need one for an unpaid invoice").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedIntent {
    /// Registered document type the user wants created, if any.
    pub doc_type: Option<String>,
    /// True when the message also asks a question deserving an answer.
    pub consultation: bool,
}

/// Facade over the oracle with defensive parsing on every reply.
pub struct OracleGateway {
    oracle: Arc<dyn Oracle>,
}

impl OracleGateway {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    async fn call(&self, prompt: &str, persona: &str) -> Option<String> {
        match self.oracle.call(prompt, persona).await {
            Ok(reply) => Some(reply),
            Err(err) => {
                warn!(error = %err, "oracle call failed, degrading to default");
                None
            }
        }
    }

    /// Extracts fields for one section. Empty map on any failure.
    pub async fn extract_section(&self, text: &str, section: &SectionSchema) -> FieldMap {
        let prompt = prompts::extraction_prompt(section, text);
        let Some(reply) = self.call(&prompt, prompts::EXTRACTOR_PERSONA).await else {
            return FieldMap::new();
        };
        match first_json_object(&reply) {
            Some(value) => prune_to_section(&value, section),
            None => {
                debug!(section = %section.name, "no parsable object in extraction reply");
                FieldMap::new()
            }
        }
    }

    /// Extracts fields across several sections. Empty map on any failure.
    pub async fn extract_multi_section(
        &self,
        text: &str,
        sections: &[&SectionSchema],
    ) -> CollectedData {
        let prompt = prompts::multi_extraction_prompt(sections, text);
        let Some(reply) = self.call(&prompt, prompts::EXTRACTOR_PERSONA).await else {
            return CollectedData::new();
        };
        match first_json_object(&reply) {
            Some(value) => prune_to_sections(&value, sections),
            None => CollectedData::new(),
        }
    }

    /// Classifies a reply given the pending question.
    ///
    /// Deterministic heuristics run first; the oracle is only consulted for
    /// genuinely ambiguous messages. An unrecognized or missing kind falls
    /// back to `providing_data`, the least disruptive assumption.
    pub async fn classify_interrupt(
        &self,
        text: &str,
        doc_label: &str,
        expected_fields: &[String],
    ) -> InterruptClassification {
        if let Some(classification) = interrupt::heuristic_classification(text) {
            return classification;
        }
        let prompt = prompts::interrupt_prompt(text, doc_label, expected_fields);
        let Some(reply) = self.call(&prompt, prompts::EXTRACTOR_PERSONA).await else {
            return InterruptClassification::of(InterruptKind::ProvidingData);
        };
        let Some(value) = first_json_object(&reply) else {
            return InterruptClassification::of(InterruptKind::ProvidingData);
        };
        let kind = match value.get("kind").and_then(|k| k.as_str()) {
            Some("edit_request") => InterruptKind::EditRequest,
            Some("cancel") => InterruptKind::Cancel,
            Some("new_document_request") => InterruptKind::NewDocumentRequest,
            Some("off_topic") => InterruptKind::OffTopic,
            Some("consultation") => InterruptKind::Consultation,
            _ => InterruptKind::ProvidingData,
        };
        InterruptClassification {
            kind,
            new_doc_type: value
                .get("new_doc_type")
                .and_then(|t| t.as_str())
                .map(str::to_string),
        }
    }

    /// Resolves which of the available sections an edit request targets.
    ///
    /// The oracle's answer is validated against the allow-list; a
    /// hallucinated name comes back as `None`.
    pub async fn classify_edit_target(
        &self,
        text: &str,
        available_sections: &[String],
    ) -> Option<String> {
        // A direct mention needs no oracle.
        let lowered = text.to_lowercase();
        for name in available_sections {
            if lowered.contains(&name.to_lowercase())
                || lowered.contains(&name.replace('_', " ").to_lowercase())
            {
                return Some(name.clone());
            }
        }
        let prompt = prompts::edit_target_prompt(text, available_sections);
        let reply = self.call(&prompt, prompts::EXTRACTOR_PERSONA).await?;
        let value = first_json_object(&reply)?;
        let answer = value.get("section")?.as_str()?;
        available_sections
            .iter()
            .find(|name| name.as_str() == answer)
            .cloned()
    }

    /// Detects what a general message is asking for.
    ///
    /// Registered keywords win for the document type; otherwise the oracle's
    /// answer is validated against the registry before being trusted. The
    /// consultation flag comes from a cheap question heuristic on the keyword
    /// path and from the oracle's reply otherwise.
    pub async fn detect_intent(&self, text: &str, registry: &SchemaRegistry) -> DetectedIntent {
        if let Some(doc_type) = registry.detect_document_type(text) {
            return DetectedIntent {
                doc_type: Some(doc_type.to_string()),
                consultation: interrupt::asks_a_question(text),
            };
        }
        let prompt = prompts::intent_prompt(text, registry);
        let Some(reply) = self.call(&prompt, prompts::EXTRACTOR_PERSONA).await else {
            return DetectedIntent::default();
        };
        let Some(value) = first_json_object(&reply) else {
            return DetectedIntent::default();
        };
        let doc_type = value
            .get("doc_type")
            .and_then(|t| t.as_str())
            .and_then(|id| registry.get(id).ok())
            .map(|schema| schema.id.clone());
        let consultation = value
            .get("consultation")
            .and_then(|c| c.as_bool())
            .unwrap_or(false);
        DetectedIntent {
            doc_type,
            consultation,
        }
    }

    /// Answers a general question. Falls back to a fixed apology on failure.
    pub async fn consult(&self, text: &str) -> String {
        match self.call(text, prompts::CONSULTANT_PERSONA).await {
            Some(reply) => reply,
            None => "I'm sorry, I couldn't process that just now. Could you try \
                     rephrasing your question?"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::{FailingOracle, ScriptedOracle};
    use crate::domain::schema::{default_registry, FieldKind, FieldSpec};
    use serde_json::json;

    fn section() -> SectionSchema {
        SectionSchema::new(
            "basic_info",
            vec![
                FieldSpec::required("subject", FieldKind::Str),
                FieldSpec::required("urgency", FieldKind::choices(["Low", "High"])),
            ],
        )
    }

    fn gateway(oracle: ScriptedOracle) -> OracleGateway {
        OracleGateway::new(Arc::new(oracle))
    }

    #[tokio::test]
    async fn extraction_parses_and_prunes() {
        let g = gateway(ScriptedOracle::with_replies([
            r#"Here you go: {"subject": "invoice", "made_up": 1}"#,
        ]));
        let fields = g.extract_section("msg", &section()).await;
        assert_eq!(fields, FieldMap::from([("subject".to_string(), json!("invoice"))]));
    }

    #[tokio::test]
    async fn oracle_failure_extracts_nothing() {
        let g = OracleGateway::new(Arc::new(FailingOracle));
        assert!(g.extract_section("msg", &section()).await.is_empty());
        assert!(g
            .extract_multi_section("msg", &[&section()])
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn heuristic_classification_skips_the_oracle() {
        let g = gateway(ScriptedOracle::new());
        let class = g.classify_interrupt("skip", "Demand Letter", &[]).await;
        assert_eq!(class.kind, InterruptKind::ProvidingData);
        assert_eq!(g.classify_interrupt("cancel", "Demand Letter", &[]).await.kind, InterruptKind::Cancel);
    }

    #[tokio::test]
    async fn oracle_classification_parses_kind_and_type() {
        let g = gateway(ScriptedOracle::with_replies([
            r#"{"kind": "new_document_request", "new_doc_type": "employment_contract"}"#,
        ]));
        let class = g
            .classify_interrupt("actually I want a contract", "Demand Letter", &[])
            .await;
        assert_eq!(class.kind, InterruptKind::NewDocumentRequest);
        assert_eq!(class.new_doc_type.as_deref(), Some("employment_contract"));
    }

    #[tokio::test]
    async fn unrecognized_kind_defaults_to_providing_data() {
        let g = gateway(ScriptedOracle::with_replies([r#"{"kind": "greeting"}"#]));
        let class = g
            .classify_interrupt("the subject is rent", "Demand Letter", &[])
            .await;
        assert_eq!(class.kind, InterruptKind::ProvidingData);
    }

    #[tokio::test]
    async fn hallucinated_edit_target_is_rejected() {
        let g = gateway(ScriptedOracle::with_replies([
            r#"{"section": "payment_history"}"#,
        ]));
        let target = g
            .classify_edit_target("fix it", &["basic_info".to_string()])
            .await;
        assert_eq!(target, None);
    }

    #[tokio::test]
    async fn direct_section_mention_needs_no_oracle() {
        let oracle = Arc::new(ScriptedOracle::new());
        let g = OracleGateway::new(oracle.clone());
        let target = g
            .classify_edit_target("the basic info please", &["basic_info".to_string()])
            .await;
        assert_eq!(target.as_deref(), Some("basic_info"));
        assert!(oracle.prompts().is_empty());
    }

    #[tokio::test]
    async fn keyword_intent_detection_needs_no_oracle() {
        let g = gateway(ScriptedOracle::new());
        let registry = default_registry();
        let intent = g
            .detect_intent("please draft a demand letter", &registry)
            .await;
        assert_eq!(intent.doc_type.as_deref(), Some("demand_letter"));
        assert!(!intent.consultation);
    }

    #[tokio::test]
    async fn question_alongside_keyword_flags_consultation() {
        let oracle = Arc::new(ScriptedOracle::new());
        let g = OracleGateway::new(oracle.clone());
        let registry = default_registry();
        let intent = g
            .detect_intent("What is a demand letter? I need a demand letter", &registry)
            .await;
        assert_eq!(intent.doc_type.as_deref(), Some("demand_letter"));
        assert!(intent.consultation);
        assert!(oracle.prompts().is_empty());
    }

    #[tokio::test]
    async fn oracle_intent_answer_is_validated_against_registry() {
        let registry = default_registry();
        let g = gateway(ScriptedOracle::with_replies([
            r#"{"doc_type": "lease_agreement", "consultation": false}"#,
        ]));
        let intent = g.detect_intent("I need a lease", &registry).await;
        assert_eq!(intent.doc_type, None);
        assert!(!intent.consultation);
    }

    #[tokio::test]
    async fn oracle_intent_reply_can_carry_both_answers() {
        let registry = default_registry();
        let g = gateway(ScriptedOracle::with_replies([
            r#"{"doc_type": "demand_letter", "consultation": true}"#,
        ]));
        let intent = g
            .detect_intent("my tenant owes rent, can I force him to pay?", &registry)
            .await;
        assert_eq!(intent.doc_type.as_deref(), Some("demand_letter"));
        assert!(intent.consultation);
    }

    #[tokio::test]
    async fn consult_degrades_to_fallback_text() {
        let g = OracleGateway::new(Arc::new(FailingOracle));
        let reply = g.consult("what is a demand letter?").await;
        assert!(reply.contains("rephrasing"));
    }
}
