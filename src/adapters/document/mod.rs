//! Document generation adapters.

pub mod prompt_generator;

pub use prompt_generator::PromptDocumentGenerator;
