//! The collection state machine.
//!
//! One turn at a time: the engine takes the last stored state plus the user
//! message, runs interrupt classification when the phase allows it, branches
//! to the phase handler and returns exactly one new state with the next
//! assistant message. No branch leaves the user without a reply.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::collection::completeness::{
    has_any_value, is_effectively_complete, missing_optional_fields, next_incomplete_section,
    section_report,
};
use crate::domain::collection::interrupt::{is_affirmative, is_explicit_skip, is_negative, InterruptKind};
use crate::domain::collection::questions;
use crate::domain::collection::validate::validate_record;
use crate::domain::collection::{to_aliased, CollectionPhase, CollectionState};
use crate::domain::schema::{DocumentTypeSchema, SchemaRegistry, SectionSchema};
use crate::ports::DocumentGenerator;

use super::gateway::OracleGateway;
use super::turn::TurnOutcome;

/// Schema-driven collection engine.
pub struct CollectionEngine {
    gateway: OracleGateway,
    registry: Arc<SchemaRegistry>,
    generator: Arc<dyn DocumentGenerator>,
}

impl CollectionEngine {
    pub fn new(
        gateway: OracleGateway,
        registry: Arc<SchemaRegistry>,
        generator: Arc<dyn DocumentGenerator>,
    ) -> Self {
        Self {
            gateway,
            registry,
            generator,
        }
    }

    /// Runs one conversation turn.
    #[instrument(skip(self, state, message), fields(phase = ?state.phase))]
    pub async fn handle_turn(&self, state: CollectionState, message: &str) -> TurnOutcome {
        let (new_state, text) = match state.phase {
            CollectionPhase::Idle => self.handle_idle(state, message).await,
            CollectionPhase::Collecting => self.handle_collecting(state, message).await,
            CollectionPhase::AwaitingOptionalDecision => {
                self.handle_optional_decision(state, message).await
            }
            CollectionPhase::AwaitingSwitchConfirmation => {
                self.handle_switch_confirmation(state, message).await
            }
            CollectionPhase::AwaitingEditSelection => {
                self.handle_edit_selection(state, message).await
            }
            CollectionPhase::Completed | CollectionPhase::Failed => (
                state,
                "This conversation has finished. Start a new one to create another document."
                    .to_string(),
            ),
        };
        let normalized = self.normalized_data(&new_state);
        TurnOutcome::new(text, new_state, normalized)
    }

    fn normalized_data(&self, state: &CollectionState) -> serde_json::Value {
        state
            .doc_type
            .as_deref()
            .and_then(|id| self.registry.get(id).ok())
            .map(|doc| to_aliased(doc, &state.collected))
            .unwrap_or_else(|| json!({}))
    }

    fn doc_for<'a>(&'a self, state: &CollectionState) -> Option<&'a DocumentTypeSchema> {
        state
            .doc_type
            .as_deref()
            .and_then(|id| self.registry.get(id).ok())
    }

    fn supported_types_reply(&self) -> String {
        let labels = self
            .registry
            .ids()
            .map(|id| self.registry.get(id).map(|d| d.label()).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "I can help you create these document types: {}. Which one would you like?",
            labels
        )
    }

    // --- IDLE -----------------------------------------------------------

    async fn handle_idle(&self, state: CollectionState, message: &str) -> (CollectionState, String) {
        let intent = self.gateway.detect_intent(message, &self.registry).await;
        match intent.doc_type {
            Some(doc_type) => {
                let (new_state, kick_off) = self.start_collection(&doc_type, message).await;
                if intent.consultation {
                    // The message also asked a question: answer it first.
                    let answer = self.gateway.consult(message).await;
                    let text = format!(
                        "{}\n\nRegarding the document you requested:\n{}",
                        answer, kick_off
                    );
                    return (new_state, text);
                }
                (new_state, kick_off)
            }
            None => (state, self.gateway.consult(message).await),
        }
    }

    async fn start_collection(&self, doc_type: &str, message: &str) -> (CollectionState, String) {
        let Ok(doc) = self.registry.get(doc_type) else {
            return (CollectionState::idle(), self.supported_types_reply());
        };
        let Some(first) = doc.first_section() else {
            return (CollectionState::idle(), self.supported_types_reply());
        };
        info!(doc_type, "starting document collection");
        let mut state = CollectionState::start(doc_type, first.name.clone());

        // Harvest whatever the triggering message already carries.
        let sections: Vec<&SectionSchema> = doc.sections.iter().collect();
        let harvested = self.gateway.extract_multi_section(message, &sections).await;
        for (name, fields) in harvested {
            state.merge_section(&name, fields);
        }

        let noted: Vec<String> = doc
            .sections
            .iter()
            .filter(|s| {
                state
                    .section_data(&s.name)
                    .map(has_any_value)
                    .unwrap_or(false)
            })
            .map(|s| format!("**{}**", s.title()))
            .collect();
        let intro = if noted.is_empty() {
            format!("Great — let's create your {}.", doc.label())
        } else {
            format!(
                "Great — let's create your {}. I've noted down the details you \
                 gave for the {} section{}.",
                doc.label(),
                noted.join(", "),
                if noted.len() == 1 { "" } else { "s" }
            )
        };
        let (state, question) = self.advance(state, false).await;
        (state, format!("{}\n\n{}", intro, question))
    }

    // --- COLLECTING -----------------------------------------------------

    async fn handle_collecting(
        &self,
        state: CollectionState,
        message: &str,
    ) -> (CollectionState, String) {
        let Some(doc) = self.doc_for(&state) else {
            return (CollectionState::idle(), self.supported_types_reply());
        };
        let Some(section) = current_section(doc, &state) else {
            return self.advance(state, false).await;
        };

        let expected = section_report(section, state.section_data(&section.name)).missing_required;
        let expected = if expected.is_empty() {
            section.fields.iter().map(|f| f.name.clone()).collect()
        } else {
            expected
        };
        let classification = self
            .gateway
            .classify_interrupt(message, &doc.label(), &expected)
            .await;

        match classification.kind {
            InterruptKind::ProvidingData => self.handle_data(state, message).await,
            InterruptKind::Cancel => self.handle_cancel(),
            InterruptKind::EditRequest => self.open_edit_menu(state),
            InterruptKind::NewDocumentRequest => {
                self.offer_switch(state, message, classification.new_doc_type)
            }
            InterruptKind::OffTopic => {
                let text = format!(
                    "{}\n\n{}",
                    questions::off_topic_retry(section),
                    questions::section_question(section)
                );
                (state, text)
            }
            InterruptKind::Consultation => {
                // Answer and leave every bit of state untouched.
                let reply = self.gateway.consult(message).await;
                (state, reply)
            }
        }
    }

    async fn handle_data(
        &self,
        mut state: CollectionState,
        message: &str,
    ) -> (CollectionState, String) {
        let Some(doc) = self.doc_for(&state) else {
            return (CollectionState::idle(), self.supported_types_reply());
        };
        let Some(section) = current_section(doc, &state) else {
            return self.advance(state, false).await;
        };
        let report = section_report(section, state.section_data(&section.name));

        if is_explicit_skip(message) {
            if !report.complete {
                // Required fields outstanding: a skip is refused.
                let text = questions::skip_refused(section);
                return (state, text);
            }
            let name = section.name.clone();
            let meaningful = state
                .section_data(&name)
                .map(has_any_value)
                .unwrap_or(false);
            if meaningful {
                state.mark_optionals_offered(&name);
            } else {
                state.mark_skipped(&name);
            }
            return self.advance(state, false).await;
        }

        let extracted = self.gateway.extract_section(message, section).await;
        if extracted.is_empty() {
            let text = if section.has_required_fields() {
                format!(
                    "I couldn't find that information in your message.\n\n{}",
                    questions::follow_up_question(section, &report.missing_required)
                )
            } else {
                format!(
                    "I couldn't find any details for the **{}** section in that. You can \
                     provide them, or say 'skip' to move on.",
                    section.title()
                )
            };
            return (state, text);
        }

        let name = section.name.clone();
        state.merge_section(&name, extracted);
        self.advance(state, true).await
    }

    fn handle_cancel(&self) -> (CollectionState, String) {
        info!("collection cancelled, discarding data");
        (
            CollectionState::idle(),
            "No problem — I've cancelled the document and discarded the details we \
             collected. Let me know if I can help with anything else."
                .to_string(),
        )
    }

    fn open_edit_menu(&self, mut state: CollectionState) -> (CollectionState, String) {
        let Some(doc) = self.doc_for(&state) else {
            return (CollectionState::idle(), self.supported_types_reply());
        };
        let menu = questions::edit_menu(doc, &state.collected);
        if populated_sections(doc, &state).is_empty() {
            // Nothing to edit: stay put.
            return (state, menu);
        }
        state.previous_section = state.current_section.clone();
        state.phase = CollectionPhase::AwaitingEditSelection;
        (state, menu)
    }

    fn offer_switch(
        &self,
        mut state: CollectionState,
        message: &str,
        hinted_type: Option<String>,
    ) -> (CollectionState, String) {
        let Some(doc) = self.doc_for(&state) else {
            return (CollectionState::idle(), self.supported_types_reply());
        };
        let requested = hinted_type
            .as_deref()
            .and_then(|t| self.resolve_doc_type(t))
            .or_else(|| self.resolve_doc_type(message));
        match requested {
            Some(new_type) if Some(new_type.as_str()) != state.doc_type.as_deref() => {
                let current_label = doc.label();
                let new_label = self
                    .registry
                    .get(&new_type)
                    .map(|d| d.label())
                    .unwrap_or_else(|_| new_type.clone());
                state.saved_snapshot = Some(state.snapshot());
                state.pending_switch_doc_type = Some(new_type);
                state.phase = CollectionPhase::AwaitingSwitchConfirmation;
                let text = questions::switch_confirmation(&current_label, &new_label);
                (state, text)
            }
            _ => {
                let text = format!(
                    "I'm not sure which document you'd like instead. {}",
                    self.supported_types_reply()
                );
                (state, text)
            }
        }
    }

    fn resolve_doc_type(&self, text: &str) -> Option<String> {
        if self.registry.get(text).is_ok() {
            return Some(text.to_string());
        }
        self.registry.detect_document_type(text).map(str::to_string)
    }

    // --- AWAITING_OPTIONAL_DECISION --------------------------------------

    async fn handle_optional_decision(
        &self,
        mut state: CollectionState,
        message: &str,
    ) -> (CollectionState, String) {
        let Some(doc) = self.doc_for(&state) else {
            return (CollectionState::idle(), self.supported_types_reply());
        };
        let Some(section) = current_section(doc, &state) else {
            return self.advance(state, false).await;
        };

        if is_explicit_skip(message) {
            state.pending_optional_fields.clear();
            state.phase = CollectionPhase::Collecting;
            return self.advance(state, false).await;
        }

        let classification = self
            .gateway
            .classify_interrupt(message, &doc.label(), &state.pending_optional_fields)
            .await;
        match classification.kind {
            InterruptKind::Cancel => return self.handle_cancel(),
            InterruptKind::EditRequest => return self.open_edit_menu(state),
            InterruptKind::NewDocumentRequest => {
                return self.offer_switch(state, message, classification.new_doc_type)
            }
            InterruptKind::Consultation => {
                let reply = self.gateway.consult(message).await;
                return (state, reply);
            }
            InterruptKind::ProvidingData | InterruptKind::OffTopic => {}
        }

        let extracted = self.gateway.extract_section(message, section).await;
        if extracted.is_empty() {
            // Ambiguous reply: neutral re-prompt with the same offer.
            let text = format!(
                "I didn't catch any of those optional details.\n\n{}",
                questions::optional_fields_prompt(section, &state.pending_optional_fields)
            );
            return (state, text);
        }

        let name = section.name.clone();
        state.merge_section(&name, extracted);
        let remaining = missing_optional_fields(section, state.section_data(&name));
        if remaining.is_empty() {
            state.pending_optional_fields.clear();
            state.phase = CollectionPhase::Collecting;
            return self.advance(state, false).await;
        }
        state.pending_optional_fields = remaining.clone();
        let text = questions::optional_fields_prompt(section, &remaining);
        (state, text)
    }

    // --- AWAITING_SWITCH_CONFIRMATION ------------------------------------

    async fn handle_switch_confirmation(
        &self,
        mut state: CollectionState,
        message: &str,
    ) -> (CollectionState, String) {
        if is_affirmative(message) {
            let Some(new_type) = state.pending_switch_doc_type.clone() else {
                return (CollectionState::idle(), self.supported_types_reply());
            };
            info!(doc_type = %new_type, "switch confirmed, discarding previous progress");
            return self.start_collection(&new_type, message).await;
        }
        if is_negative(message) {
            let restored = state
                .saved_snapshot
                .take()
                .map(|snap| *snap)
                .unwrap_or(state);
            let text = format!(
                "Okay, let's continue where we left off.\n\n{}",
                self.resume_question(&restored)
            );
            return (restored, text);
        }
        let current_label = self
            .doc_for(&state)
            .map(|d| d.label())
            .unwrap_or_else(|| "current document".to_string());
        let new_label = state
            .pending_switch_doc_type
            .as_deref()
            .and_then(|t| self.registry.get(t).ok())
            .map(|d| d.label())
            .unwrap_or_else(|| "new document".to_string());
        let text = format!(
            "Please answer yes or no. {}",
            questions::switch_confirmation(&current_label, &new_label)
        );
        (state, text)
    }

    /// Regenerates the pending question after a snapshot restore.
    fn resume_question(&self, state: &CollectionState) -> String {
        let Some(doc) = self.doc_for(state) else {
            return self.supported_types_reply();
        };
        let Some(section) = current_section(doc, state) else {
            return self.supported_types_reply();
        };
        match state.phase {
            CollectionPhase::AwaitingOptionalDecision => {
                questions::optional_fields_prompt(section, &state.pending_optional_fields)
            }
            _ => {
                let report = section_report(section, state.section_data(&section.name));
                if report.complete || state.section_data(&section.name).is_none() {
                    questions::section_question(section)
                } else {
                    questions::follow_up_question(section, &report.missing_required)
                }
            }
        }
    }

    // --- AWAITING_EDIT_SELECTION ------------------------------------------

    async fn handle_edit_selection(
        &self,
        mut state: CollectionState,
        message: &str,
    ) -> (CollectionState, String) {
        let Some(doc) = self.doc_for(&state) else {
            return (CollectionState::idle(), self.supported_types_reply());
        };
        let available = populated_sections(doc, &state);
        let target = self.gateway.classify_edit_target(message, &available).await;
        match target.as_deref().and_then(|name| doc.section(name)) {
            Some(section) => {
                info!(section = %section.name, "edit target resolved");
                state.phase = CollectionPhase::Collecting;
                state.current_section = Some(section.name.clone());
                state.pending_optional_fields.clear();
                state.previous_section = None;
                let text = format!(
                    "Sure, let's update the **{}** section.\n\n{}",
                    section.title(),
                    questions::section_question(section)
                );
                (state, text)
            }
            None => {
                let text = format!(
                    "I'm not sure which section you mean.\n\n{}",
                    questions::edit_menu(doc, &state.collected)
                );
                (state, text)
            }
        }
    }

    // --- ADVANCE & FINALIZE -----------------------------------------------

    /// Moves the conversation forward after a merge, skip or restore.
    ///
    /// Decides between offering optional fields, asking for the first
    /// incomplete section in declared order, or finalizing.
    async fn advance(
        &self,
        mut state: CollectionState,
        partial_reply: bool,
    ) -> (CollectionState, String) {
        let Some(doc) = self.doc_for(&state) else {
            return (CollectionState::idle(), self.supported_types_reply());
        };

        // Offer the just-satisfied section's optional fields exactly once.
        if let Some(section) = current_section(doc, &state) {
            let name = section.name.clone();
            let report = section_report(section, state.section_data(&name));
            if report.complete
                && is_effectively_complete(section, &state)
                && !state.optionals_offered(&name)
                && !state.is_skipped(&name)
            {
                let missing = missing_optional_fields(section, state.section_data(&name));
                if !missing.is_empty() {
                    let text = questions::optional_fields_prompt(section, &missing);
                    state.phase = CollectionPhase::AwaitingOptionalDecision;
                    state.pending_optional_fields = missing;
                    state.mark_optionals_offered(&name);
                    return (state, text);
                }
            }
        }

        let previous = state.current_section.clone();
        match next_incomplete_section(doc, &state) {
            Some(next) => {
                let fresh = previous.as_deref() != Some(next.name.as_str());
                let text = if fresh || !partial_reply {
                    questions::section_question(next)
                } else {
                    let missing =
                        section_report(next, state.section_data(&next.name)).missing_required;
                    questions::follow_up_question(next, &missing)
                };
                state.phase = CollectionPhase::Collecting;
                state.current_section = Some(next.name.clone());
                state.pending_optional_fields.clear();
                (state, text)
            }
            None => self.finalize(state).await,
        }
    }

    /// Validates the full record and hands it to document generation.
    async fn finalize(&self, mut state: CollectionState) -> (CollectionState, String) {
        let Some(doc) = self.doc_for(&state) else {
            state.phase = CollectionPhase::Failed;
            return (
                state,
                "Something went wrong finishing your document. Please start over."
                    .to_string(),
            );
        };

        match validate_record(doc, &state.collected) {
            Ok(record) => {
                let aliased = to_aliased(doc, &record);
                state.collected = record;
                state.phase = CollectionPhase::Completed;
                state.current_section = None;
                info!(doc_type = %doc.id, "record validated, generating document");
                let text = match self.generator.generate(&doc.id, &aliased).await {
                    Ok(document) => {
                        format!("Here is your {}:\n\n{}", doc.label(), document)
                    }
                    Err(err) => {
                        info!(error = %err, "document generation failed after validation");
                        format!(
                            "All the details for your {} are complete, but I couldn't \
                             generate the document just now. Please try again shortly.",
                            doc.label()
                        )
                    }
                };
                (state, text)
            }
            Err(err) => {
                // Reopen the implicated section with a targeted re-ask.
                let Some(section) = doc.section(&err.section) else {
                    state.phase = CollectionPhase::Failed;
                    return (
                        state,
                        "Something went wrong validating your document. Please start over."
                            .to_string(),
                    );
                };
                state.phase = CollectionPhase::Collecting;
                state.current_section = Some(section.name.clone());
                state.pending_optional_fields.clear();
                let field_title = err
                    .field
                    .as_deref()
                    .and_then(|f| section.field(f))
                    .map(|f| f.title())
                    .unwrap_or_else(|| section.title());
                let text = format!(
                    "One of the provided details needs fixing before I can generate the \
                     document: **{}** — {}. Could you provide it again?",
                    field_title, err.reason
                );
                (state, text)
            }
        }
    }
}

fn current_section<'a>(
    doc: &'a DocumentTypeSchema,
    state: &CollectionState,
) -> Option<&'a SectionSchema> {
    state
        .current_section
        .as_deref()
        .and_then(|name| doc.section(name))
}

fn populated_sections(doc: &DocumentTypeSchema, state: &CollectionState) -> Vec<String> {
    doc.sections
        .iter()
        .filter(|s| {
            state
                .section_data(&s.name)
                .map(|d| !d.is_empty())
                .unwrap_or(false)
        })
        .map(|s| s.name.clone())
        .collect()
}
