//! Interrupt classification for interruptible phases.
//!
//! Cheap deterministic heuristics run before any oracle round trip: a short
//! reply like "no" must never be read as a cancellation, and an exact "skip"
//! never needs a classifier to interpret.

use serde::{Deserialize, Serialize};

/// What a user reply means when it is not a direct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptKind {
    /// The reply answers (or declines) the pending question.
    ProvidingData,
    /// The user wants to revisit previously collected data.
    EditRequest,
    /// The user wants to abandon the flow entirely.
    Cancel,
    /// The user wants a different document type.
    NewDocumentRequest,
    /// The reply is unrelated to the pending question.
    OffTopic,
    /// A general question to be answered without touching state.
    Consultation,
}

/// Classification of one reply, with the requested type on a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptClassification {
    pub kind: InterruptKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_doc_type: Option<String>,
}

impl InterruptClassification {
    pub fn of(kind: InterruptKind) -> Self {
        Self {
            kind,
            new_doc_type: None,
        }
    }

    pub fn new_document(doc_type: impl Into<String>) -> Self {
        Self {
            kind: InterruptKind::NewDocumentRequest,
            new_doc_type: Some(doc_type.into()),
        }
    }
}

const DECLINE_TOKENS: &[&str] = &["skip", "none", "n/a", "na", "nothing", "no", "nope"];
const EDIT_KEYWORDS: &[&str] = &["edit", "change", "correct", "update", "go back"];
const CANCEL_TOKENS: &[&str] = &["cancel", "stop"];
const AFFIRMATIVE_TOKENS: &[&str] = &["yes", "y", "yeah", "yep", "sure", "ok", "okay", "confirm"];
const NEGATIVE_TOKENS: &[&str] = &["no", "n", "nope", "nah", "keep", "continue", "decline"];

fn normalized(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '/')
        .to_lowercase()
}

fn contains_word(text: &str, keyword: &str) -> bool {
    let padded = format!(" {} ", text.replace(|c: char| c.is_ascii_punctuation(), " "));
    padded.contains(&format!(" {} ", keyword))
}

/// Classifies a reply without the oracle, when the message is unambiguous.
///
/// Returns `None` when the reply needs a real classifier.
pub fn heuristic_classification(text: &str) -> Option<InterruptClassification> {
    let lowered = normalized(text);
    if lowered.is_empty() {
        return Some(InterruptClassification::of(InterruptKind::ProvidingData));
    }
    // Exact decline tokens answer the pending question with no fields.
    if DECLINE_TOKENS.contains(&lowered.as_str()) {
        return Some(InterruptClassification::of(InterruptKind::ProvidingData));
    }
    // Cancellation only when the stop word stands alone.
    if CANCEL_TOKENS.contains(&lowered.as_str()) {
        return Some(InterruptClassification::of(InterruptKind::Cancel));
    }
    if EDIT_KEYWORDS.iter().any(|kw| contains_word(&lowered, kw)) {
        return Some(InterruptClassification::of(InterruptKind::EditRequest));
    }
    None
}

const QUESTION_MARKERS: &[&str] = &["what is", "what's", "how do", "how does", "why", "explain"];

/// Returns true if the message asks a general question alongside whatever
/// else it says. Used to pair a consultation answer with an intake kick-off.
pub fn asks_a_question(text: &str) -> bool {
    let lowered = text.to_lowercase();
    QUESTION_MARKERS.iter().any(|m| lowered.contains(m))
}

/// Returns true if the reply explicitly declines the pending offer.
pub fn is_explicit_skip(text: &str) -> bool {
    let lowered = normalized(text);
    DECLINE_TOKENS.contains(&lowered.as_str())
        || lowered == "no thanks"
        || lowered == "no thank you"
        || lowered == "skip it"
        || lowered == "skip this"
}

/// Returns true if the reply is an unambiguous yes.
pub fn is_affirmative(text: &str) -> bool {
    AFFIRMATIVE_TOKENS.contains(&normalized(text).as_str())
}

/// Returns true if the reply is an unambiguous no.
pub fn is_negative(text: &str) -> bool {
    NEGATIVE_TOKENS.contains(&normalized(text).as_str())
}
