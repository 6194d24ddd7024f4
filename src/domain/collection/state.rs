//! Collection state: the persisted shape of one intake conversation.
//!
//! Exactly one live `CollectionState` exists per conversation; every turn is
//! computed from the user message plus the last stored state and ends with
//! one new state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::foundation::StateMachine;

/// Field name to untyped value, for one section.
pub type FieldMap = BTreeMap<String, Value>;

/// Section name to its collected fields. Values stay untyped until finalize.
pub type CollectedData = BTreeMap<String, FieldMap>;

/// The phase of the collection conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionPhase {
    /// No document intake in progress; general questions are handled here.
    #[default]
    Idle,

    /// Actively filling the current section.
    Collecting,

    /// Current section is required-complete; user was offered its optional
    /// fields and may add data or skip.
    AwaitingOptionalDecision,

    /// User asked for a different document type mid-flow; awaiting yes/no.
    AwaitingSwitchConfirmation,

    /// User asked to edit; awaiting a section choice from the menu.
    AwaitingEditSelection,

    /// Record validated and handed off to document generation.
    Completed,

    /// Collection ended without a usable record.
    Failed,
}

impl CollectionPhase {
    /// Returns true if a turn in this phase starts with interrupt
    /// classification before the phase-specific handling runs.
    pub fn is_interruptible(&self) -> bool {
        matches!(
            self,
            Self::Collecting | Self::AwaitingOptionalDecision | Self::AwaitingSwitchConfirmation
        )
    }

    /// Returns true if a document intake is in flight.
    pub fn is_collecting(&self) -> bool {
        !matches!(self, Self::Idle | Self::Completed | Self::Failed)
    }
}

impl StateMachine for CollectionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CollectionPhase::*;
        match self {
            Idle => vec![Idle, Collecting],
            Collecting => vec![
                Collecting,
                AwaitingOptionalDecision,
                AwaitingSwitchConfirmation,
                AwaitingEditSelection,
                Idle,
                Completed,
                Failed,
            ],
            AwaitingOptionalDecision => vec![
                AwaitingOptionalDecision,
                Collecting,
                AwaitingSwitchConfirmation,
                AwaitingEditSelection,
                Idle,
                Completed,
                Failed,
            ],
            AwaitingSwitchConfirmation => vec![AwaitingSwitchConfirmation, Collecting, Idle],
            AwaitingEditSelection => vec![AwaitingEditSelection, Collecting],
            Completed => vec![],
            Failed => vec![],
        }
    }
}

/// Full persisted state of one collection conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CollectionState {
    /// Current phase.
    pub phase: CollectionPhase,

    /// Document type being collected, once intent is detected.
    pub doc_type: Option<String>,

    /// Section the next reply is expected to fill.
    pub current_section: Option<String>,

    /// Everything collected so far.
    pub collected: CollectedData,

    /// Sections the user explicitly skipped.
    pub skipped_sections: BTreeSet<String>,

    /// Optional fields offered in the current `AwaitingOptionalDecision`.
    pub pending_optional_fields: Vec<String>,

    /// Sections whose optional fields have already been offered.
    pub asked_optional_for: BTreeSet<String>,

    /// Document type the user asked to switch to, while confirmation pends.
    pub pending_switch_doc_type: Option<String>,

    /// Snapshot taken before a switch offer, restored on decline.
    pub saved_snapshot: Option<Box<CollectionState>>,

    /// Section that was being filled when an edit interrupt arrived.
    pub previous_section: Option<String>,
}

impl CollectionState {
    /// Fresh idle state.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Starts collecting a document type at its first section.
    pub fn start(doc_type: impl Into<String>, first_section: impl Into<String>) -> Self {
        Self {
            phase: CollectionPhase::Collecting,
            doc_type: Some(doc_type.into()),
            current_section: Some(first_section.into()),
            ..Self::default()
        }
    }

    /// Returns the collected field map for a section, if any.
    pub fn section_data(&self, section: &str) -> Option<&FieldMap> {
        self.collected.get(section)
    }

    /// Merges newly extracted fields into a section.
    ///
    /// Later values win over earlier ones for the same field.
    pub fn merge_section(&mut self, section: &str, fields: FieldMap) {
        if fields.is_empty() {
            return;
        }
        self.collected
            .entry(section.to_string())
            .or_default()
            .extend(fields);
    }

    /// Marks a section as explicitly skipped by the user.
    pub fn mark_skipped(&mut self, section: &str) {
        self.skipped_sections.insert(section.to_string());
    }

    /// Returns true if the user explicitly skipped this section.
    pub fn is_skipped(&self, section: &str) -> bool {
        self.skipped_sections.contains(section)
    }

    /// Records that a section's optional fields were offered.
    pub fn mark_optionals_offered(&mut self, section: &str) {
        self.asked_optional_for.insert(section.to_string());
    }

    /// Returns true if the section's optional fields were already offered.
    pub fn optionals_offered(&self, section: &str) -> bool {
        self.asked_optional_for.contains(section)
    }

    /// Takes a deep snapshot for later restore (switch-confirmation flow).
    pub fn snapshot(&self) -> Box<CollectionState> {
        Box::new(self.clone())
    }
}
