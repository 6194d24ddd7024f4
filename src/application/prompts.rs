//! Prompt builders for every oracle capability.
//!
//! Each builder pins the reply format down hard (a single JSON object, exact
//! key set, exact allowed values) because the parsing side is deliberately
//! forgiving: the tighter the ask, the less the extractor has to rescue.

use crate::domain::schema::{FieldKind, SchemaRegistry, SectionSchema};

/// Persona for extraction and classification calls.
pub const EXTRACTOR_PERSONA: &str = "You are a precise data extraction assistant. \
You reply with a single JSON object and nothing else.";

/// Persona for general consultation replies.
pub const CONSULTANT_PERSONA: &str = "You are a knowledgeable legal consultant. \
Provide clear, concise and accurate guidance in plain language. Remind users \
that this is general information, not formal legal representation.";

fn field_descriptor(f: &crate::domain::schema::FieldSpec) -> String {
    let kind = match &f.kind {
        FieldKind::Str => "text".to_string(),
        FieldKind::Number => "number".to_string(),
        FieldKind::Boolean => "true/false".to_string(),
        FieldKind::StringList => "list of text items".to_string(),
        FieldKind::Enum(choices) => format!("one of: {}", choices.join(" | ")),
    };
    match &f.description {
        Some(desc) => format!("- \"{}\" ({}): {}", f.name, kind, desc),
        None => format!("- \"{}\" ({})", f.name, kind),
    }
}

/// Prompt for extracting one section's fields from a user message.
pub fn extraction_prompt(section: &SectionSchema, text: &str) -> String {
    let fields = section
        .fields
        .iter()
        .map(field_descriptor)
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Extract values for the fields below from the user's message.\n\
         Fields:\n{fields}\n\n\
         User message: \"{text}\"\n\n\
         Respond with a single JSON object using exactly the field names above \
         as keys. Omit any field the message does not mention. Do not invent \
         values."
    )
}

/// Prompt for extracting several sections at once (first-turn and fallback).
pub fn multi_extraction_prompt(sections: &[&SectionSchema], text: &str) -> String {
    let mut catalog = String::new();
    for section in sections {
        catalog.push_str(&format!("Section \"{}\":\n", section.name));
        for f in &section.fields {
            catalog.push_str(&field_descriptor(f));
            catalog.push('\n');
        }
    }
    format!(
        "Extract any values the user's message provides for the sections below.\n\
         {catalog}\n\
         User message: \"{text}\"\n\n\
         Respond with a single JSON object keyed by section name, each value an \
         object of the fields found in that section. Omit sections and fields \
         the message does not mention. Do not invent values."
    )
}

/// Prompt for classifying a reply while a question is pending.
pub fn interrupt_prompt(text: &str, doc_label: &str, expected_fields: &[String]) -> String {
    format!(
        "We are collecting data for a {doc_label}. The user was just asked to \
         provide: {fields}.\n\
         Classify the user's reply into exactly one kind:\n\
         - \"providing_data\": answering (or declining to answer) the question\n\
         - \"edit_request\": wants to change previously provided data\n\
         - \"cancel\": wants to abandon the document entirely\n\
         - \"new_document_request\": wants a different document type instead\n\
         - \"off_topic\": unrelated to the question and not any of the above\n\
         - \"consultation\": a general question seeking advice\n\n\
         User reply: \"{text}\"\n\n\
         Respond with a single JSON object: {{\"kind\": \"...\"}} and, only for \
         new_document_request, add \"new_doc_type\" with the requested document.",
        fields = expected_fields.join(", "),
    )
}

/// Prompt for resolving which section an edit request targets.
pub fn edit_target_prompt(text: &str, available_sections: &[String]) -> String {
    format!(
        "The user wants to edit previously collected data. The available \
         sections are: {sections}.\n\
         User reply: \"{text}\"\n\n\
         Respond with a single JSON object: {{\"section\": \"...\"}} using one \
         of the available section names exactly, or {{\"section\": null}} if \
         none of them matches.",
        sections = available_sections.join(", "),
    )
}

/// Prompt for detecting a document request in a general message.
pub fn intent_prompt(text: &str, registry: &SchemaRegistry) -> String {
    let ids = registry.ids().collect::<Vec<_>>().join(", ");
    format!(
        "Determine whether the user is asking to create one of these document \
         types: {ids}.\n\
         User message: \"{text}\"\n\n\
         Respond with a single JSON object: \
         {{\"doc_type\": \"...\", \"consultation\": true|false}}. \
         \"doc_type\" is one of the ids exactly, or null if they are not \
         asking to create any of them. \"consultation\" is true when the \
         message also asks a general question that deserves an answer of its \
         own."
    )
}
