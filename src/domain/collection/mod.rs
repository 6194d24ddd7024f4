//! The collection domain: state, completeness, interrupts, parsing,
//! validation and question composition for schema-driven intake.

pub mod completeness;
pub mod extractor;
pub mod interrupt;
pub mod normalize;
pub mod questions;
pub mod state;
pub mod validate;

pub use completeness::{
    has_any_value, is_effectively_complete, missing_optional_fields, next_incomplete_section,
    section_report, SectionReport,
};
pub use interrupt::{InterruptClassification, InterruptKind};
pub use normalize::to_aliased;
pub use state::{CollectedData, CollectionPhase, CollectionState, FieldMap};
pub use validate::{validate_record, RecordError};
