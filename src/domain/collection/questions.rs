//! Question composition: turning schemas into natural-language prompts.

use crate::domain::schema::{titleize, DocumentTypeSchema, SectionSchema};

use super::state::CollectedData;

/// Renders one field bullet with its type hint.
fn field_line(section: &SectionSchema, field_name: &str) -> String {
    match section.field(field_name) {
        Some(field) => match field.kind.hint() {
            Some(hint) => format!("- The **{}** {}", field.title(), hint),
            None => format!("- The **{}**", field.title()),
        },
        None => format!("- The **{}**", titleize(field_name)),
    }
}

/// Full question for a fresh section: enumerates every field with hints.
pub fn section_question(section: &SectionSchema) -> String {
    let fields = section
        .fields
        .iter()
        .map(|f| field_line(section, &f.name))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Okay, let's fill out the **{}** section. Please provide the following details:\n\n{}",
        section.title(),
        fields
    )
}

/// Shorter follow-up after a partial answer: targets only missing fields.
pub fn follow_up_question(section: &SectionSchema, missing: &[String]) -> String {
    let fields = missing
        .iter()
        .map(|name| field_line(section, name))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Thanks, I've noted that down. For the **{}** section I still need:\n\n{}",
        section.title(),
        fields
    )
}

/// Invitation to provide optional details or skip them.
pub fn optional_fields_prompt(section: &SectionSchema, optional_names: &[String]) -> String {
    let fields = optional_names
        .iter()
        .map(|name| field_line(section, name))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "The required details for **{}** are in. If you'd like, you can also add:\n\n{}\n\nYou can provide any of these, or say 'skip' to continue.",
        section.title(),
        fields
    )
}

/// Menu of everything collected so far, for edit selection.
///
/// Renders a distinct message when nothing has been collected yet.
pub fn edit_menu(doc: &DocumentTypeSchema, collected: &CollectedData) -> String {
    let mut lines = Vec::new();
    for section in &doc.sections {
        let Some(data) = collected.get(&section.name) else {
            continue;
        };
        if data.is_empty() {
            continue;
        }
        let fields = data
            .keys()
            .map(|k| titleize(k))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("- **{}**: {}", section.title(), fields));
    }

    if lines.is_empty() {
        return "We haven't collected any details yet, so there's nothing to edit. \
                Let's continue with the current section instead."
            .to_string();
    }

    format!(
        "Sure — here's what we have so far. Which section would you like to change?\n\n{}",
        lines.join("\n")
    )
}

/// Re-ask after an off-topic reply.
pub fn off_topic_retry(section: &SectionSchema) -> String {
    format!(
        "That doesn't look like the information I need for the **{}** section. \
         Shall we continue, or would you like to do something else?",
        section.title()
    )
}

/// Refusal when a skip was requested but required fields are outstanding.
pub fn skip_refused(section: &SectionSchema) -> String {
    format!(
        "I'm sorry, the **{}** section contains required information and can't be skipped.\n\n{}",
        section.title(),
        section_question(section)
    )
}

/// Confirmation prompt before abandoning the current flow for a new type.
pub fn switch_confirmation(current_label: &str, new_label: &str) -> String {
    format!(
        "It looks like you want to start a new document ('{}'). \
         Are you sure you want to stop creating the current '{}'?",
        new_label, current_label
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{FieldKind, FieldSpec};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn section() -> SectionSchema {
        SectionSchema::new(
            "basic_info",
            vec![
                FieldSpec::required("letter_date", FieldKind::Str).with_alias("letterDate"),
                FieldSpec::required("urgency", FieldKind::choices(["Low", "High"])),
                FieldSpec::optional("notify_by_email", FieldKind::Boolean),
                FieldSpec::optional("attachments", FieldKind::StringList),
            ],
        )
    }

    fn doc() -> DocumentTypeSchema {
        DocumentTypeSchema::new(
            "demand_letter",
            vec![
                section(),
                SectionSchema::new(
                    "sender_info",
                    vec![FieldSpec::required("name", FieldKind::Str)],
                ),
            ],
        )
    }

    #[test]
    fn section_question_lists_every_field_with_hints() {
        let q = section_question(&section());
        assert!(q.contains("**Basic Info**"));
        assert!(q.contains("- The **Letter Date**"));
        assert!(q.contains("(choose from: 'Low', 'High')"));
        assert!(q.contains("(yes/no)"));
        assert!(q.contains("(you can provide one or more items)"));
    }

    #[test]
    fn follow_up_targets_only_missing_fields() {
        let q = follow_up_question(&section(), &["urgency".to_string()]);
        assert!(q.contains("**Urgency**"));
        assert!(!q.contains("**Letter Date**"));
    }

    #[test]
    fn optional_prompt_mentions_skip() {
        let q = optional_fields_prompt(&section(), &["attachments".to_string()]);
        assert!(q.contains("'skip'"));
        assert!(q.contains("**Attachments**"));
    }

    #[test]
    fn edit_menu_lists_populated_sections_in_flow_order() {
        let mut collected = CollectedData::new();
        collected.insert(
            "sender_info".to_string(),
            BTreeMap::from([("name".to_string(), json!("John Doe"))]),
        );
        collected.insert(
            "basic_info".to_string(),
            BTreeMap::from([("subject".to_string(), json!("invoice"))]),
        );
        let menu = edit_menu(&doc(), &collected);
        let basic = menu.find("**Basic Info**").unwrap();
        let sender = menu.find("**Sender Info**").unwrap();
        assert!(basic < sender);
    }

    #[test]
    fn edit_menu_with_no_data_renders_distinct_message() {
        let menu = edit_menu(&doc(), &CollectedData::new());
        assert!(menu.contains("nothing to edit"));
    }

    #[test]
    fn skip_refused_re_asks_the_full_question() {
        let msg = skip_refused(&section());
        assert!(msg.contains("can't be skipped"));
        assert!(msg.contains("- The **Letter Date**"));
    }

    #[test]
    fn switch_confirmation_names_both_documents() {
        let msg = switch_confirmation("Demand Letter", "Employment Contract");
        assert!(msg.contains("Employment Contract"));
        assert!(msg.contains("Demand Letter"));
    }
}
