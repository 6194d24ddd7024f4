//! Completeness checking over collected section data.
//!
//! A field is present when its canonical name or alias maps to a non-null
//! value. A section with required fields is complete once every required
//! field is present. A section with zero required fields follows the
//! skip-or-data rule: it is never complete while empty and unvisited.

use serde_json::Value;

use crate::domain::schema::{DocumentTypeSchema, FieldSpec, SectionSchema};

use super::state::{CollectionState, FieldMap};

/// Completeness report for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    /// True when every required field is present.
    pub complete: bool,
    /// Canonical names of required fields still missing.
    pub missing_required: Vec<String>,
}

/// Returns the collected value for a field, looked up by canonical name or
/// alias. Null values count as absent.
pub fn field_value<'a>(data: &'a FieldMap, field: &FieldSpec) -> Option<&'a Value> {
    let value = data
        .get(&field.name)
        .or_else(|| field.alias.as_ref().and_then(|a| data.get(a)))?;
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

/// Reports required-completeness of a section against collected data.
pub fn section_report(schema: &SectionSchema, data: Option<&FieldMap>) -> SectionReport {
    let empty = FieldMap::new();
    let data = data.unwrap_or(&empty);
    let missing_required: Vec<String> = schema
        .required_fields()
        .filter(|f| field_value(data, f).is_none())
        .map(|f| f.name.clone())
        .collect();
    SectionReport {
        complete: missing_required.is_empty(),
        missing_required,
    }
}

/// Returns the canonical names of optional fields not yet collected.
pub fn missing_optional_fields(schema: &SectionSchema, data: Option<&FieldMap>) -> Vec<String> {
    let empty = FieldMap::new();
    let data = data.unwrap_or(&empty);
    schema
        .optional_fields()
        .filter(|f| field_value(data, f).is_none())
        .map(|f| f.name.clone())
        .collect()
}

/// Returns true if the section holds at least one meaningful value.
/// Nulls, blank strings and empty collections do not count.
pub fn has_any_value(data: &FieldMap) -> bool {
    data.values().any(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    })
}

/// Decides whether a section needs no further attention.
///
/// Sections with required fields are effectively complete once
/// required-complete. All-optional sections need either data or an explicit
/// skip; an empty, unvisited section never counts as complete.
pub fn is_effectively_complete(
    schema: &SectionSchema,
    state: &CollectionState,
) -> bool {
    let data = state.section_data(&schema.name);
    if schema.has_required_fields() {
        return section_report(schema, data).complete;
    }
    if state.is_skipped(&schema.name) {
        return true;
    }
    data.map(has_any_value).unwrap_or(false)
}

/// Finds the first section, in declared order, that is not effectively
/// complete. Scanning always starts from the head of the flow so that late
/// data landing in an earlier section is honored.
pub fn next_incomplete_section<'a>(
    doc: &'a DocumentTypeSchema,
    state: &CollectionState,
) -> Option<&'a SectionSchema> {
    doc.sections
        .iter()
        .find(|section| !is_effectively_complete(section, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{FieldKind, FieldSpec};
    use serde_json::json;

    fn required_section() -> SectionSchema {
        SectionSchema::new(
            "basic_info",
            vec![
                FieldSpec::required("letter_date", FieldKind::Str).with_alias("letterDate"),
                FieldSpec::required("subject", FieldKind::Str),
                FieldSpec::optional("letter_number", FieldKind::Str).with_alias("letterNumber"),
            ],
        )
    }

    fn optional_section() -> SectionSchema {
        SectionSchema::new(
            "legal_basis",
            vec![
                FieldSpec::optional("contract_clause", FieldKind::Str)
                    .with_alias("contractClause"),
                FieldSpec::optional("applicable_laws", FieldKind::StringList)
                    .with_alias("applicableLaws"),
            ],
        )
    }

    mod presence {
        use super::*;

        #[test]
        fn canonical_name_counts_as_present() {
            let data = FieldMap::from([("subject".to_string(), json!("unpaid invoice"))]);
            let report = section_report(&required_section(), Some(&data));
            assert_eq!(report.missing_required, vec!["letter_date"]);
        }

        #[test]
        fn alias_counts_as_present() {
            let data = FieldMap::from([
                ("letterDate".to_string(), json!("2025-01-10")),
                ("subject".to_string(), json!("unpaid invoice")),
            ]);
            let report = section_report(&required_section(), Some(&data));
            assert!(report.complete);
        }

        #[test]
        fn null_value_counts_as_absent() {
            let data = FieldMap::from([
                ("letter_date".to_string(), json!(null)),
                ("subject".to_string(), json!("unpaid invoice")),
            ]);
            let report = section_report(&required_section(), Some(&data));
            assert_eq!(report.missing_required, vec!["letter_date"]);
        }

        #[test]
        fn no_data_reports_every_required_field() {
            let report = section_report(&required_section(), None);
            assert!(!report.complete);
            assert_eq!(report.missing_required, vec!["letter_date", "subject"]);
        }
    }

    mod optional_fields {
        use super::*;

        #[test]
        fn missing_optionals_exclude_collected_ones() {
            let data = FieldMap::from([("letterNumber".to_string(), json!("2"))]);
            let missing = missing_optional_fields(&required_section(), Some(&data));
            assert!(missing.is_empty());
        }

        #[test]
        fn missing_optionals_listed_in_declared_order() {
            let missing = missing_optional_fields(&optional_section(), None);
            assert_eq!(missing, vec!["contract_clause", "applicable_laws"]);
        }
    }

    mod effectively_complete {
        use super::*;

        #[test]
        fn required_section_complete_iff_required_fields_present() {
            let mut state = CollectionState::start("demand_letter", "basic_info");
            assert!(!is_effectively_complete(&required_section(), &state));
            state.merge_section(
                "basic_info",
                FieldMap::from([
                    ("letter_date".to_string(), json!("2025-01-10")),
                    ("subject".to_string(), json!("unpaid invoice")),
                ]),
            );
            assert!(is_effectively_complete(&required_section(), &state));
        }

        #[test]
        fn empty_unvisited_all_optional_section_is_not_complete() {
            let state = CollectionState::start("demand_letter", "legal_basis");
            assert!(!is_effectively_complete(&optional_section(), &state));
        }

        #[test]
        fn all_optional_section_completes_on_explicit_skip() {
            let mut state = CollectionState::start("demand_letter", "legal_basis");
            state.mark_skipped("legal_basis");
            assert!(is_effectively_complete(&optional_section(), &state));
        }

        #[test]
        fn all_optional_section_completes_on_any_value() {
            let mut state = CollectionState::start("demand_letter", "legal_basis");
            state.merge_section(
                "legal_basis",
                FieldMap::from([("contract_clause".to_string(), json!("clause 4.2"))]),
            );
            assert!(is_effectively_complete(&optional_section(), &state));
        }

        #[test]
        fn whitespace_only_string_does_not_count_as_data() {
            let mut state = CollectionState::start("demand_letter", "legal_basis");
            state.merge_section(
                "legal_basis",
                FieldMap::from([("contract_clause".to_string(), json!("   "))]),
            );
            assert!(!is_effectively_complete(&optional_section(), &state));
        }
    }

    mod meaningful_values {
        use super::*;

        #[test]
        fn blank_and_empty_values_are_not_meaningful() {
            let data = FieldMap::from([
                ("contract_clause".to_string(), json!("   ")),
                ("applicable_laws".to_string(), json!([])),
                ("notes".to_string(), json!(null)),
            ]);
            assert!(!has_any_value(&data));
        }

        #[test]
        fn one_real_value_is_enough() {
            let data = FieldMap::from([
                ("contract_clause".to_string(), json!("   ")),
                ("applicable_laws".to_string(), json!(["Civil Code art. 1159"])),
            ]);
            assert!(has_any_value(&data));
        }
    }

    mod next_incomplete {
        use super::*;
        use crate::domain::schema::DocumentTypeSchema;

        fn doc() -> DocumentTypeSchema {
            DocumentTypeSchema::new(
                "demand_letter",
                vec![
                    required_section(),
                    SectionSchema::new(
                        "sender_info",
                        vec![FieldSpec::required("name", FieldKind::Str)],
                    ),
                    optional_section(),
                ],
            )
        }

        #[test]
        fn scan_starts_from_head_of_flow() {
            let doc = doc();
            let mut state = CollectionState::start("demand_letter", "sender_info");
            // sender_info filled first; basic_info still missing
            state.merge_section(
                "sender_info",
                FieldMap::from([("name".to_string(), json!("John Doe"))]),
            );
            let next = next_incomplete_section(&doc, &state).unwrap();
            assert_eq!(next.name, "basic_info");
        }

        #[test]
        fn none_when_everything_effectively_complete() {
            let doc = doc();
            let mut state = CollectionState::start("demand_letter", "basic_info");
            state.merge_section(
                "basic_info",
                FieldMap::from([
                    ("letter_date".to_string(), json!("2025-01-10")),
                    ("subject".to_string(), json!("unpaid invoice")),
                ]),
            );
            state.merge_section(
                "sender_info",
                FieldMap::from([("name".to_string(), json!("John Doe"))]),
            );
            state.mark_skipped("legal_basis");
            assert!(next_incomplete_section(&doc, &state).is_none());
        }
    }

    mod properties {
        use super::*;
        use crate::domain::schema::DocumentTypeSchema;
        use proptest::prelude::*;

        fn flow() -> DocumentTypeSchema {
            DocumentTypeSchema::new(
                "demand_letter",
                vec![
                    SectionSchema::new(
                        "basic_info",
                        vec![FieldSpec::required("subject", FieldKind::Str)],
                    ),
                    SectionSchema::new(
                        "sender_info",
                        vec![FieldSpec::required("name", FieldKind::Str)],
                    ),
                    SectionSchema::new(
                        "recipient_info",
                        vec![FieldSpec::required("name", FieldKind::Str)],
                    ),
                ],
            )
        }

        fn state_with_filled(doc: &DocumentTypeSchema, filled: &std::collections::BTreeSet<usize>) -> CollectionState {
            let mut state = CollectionState::start("demand_letter", "basic_info");
            for index in filled {
                let section = &doc.sections[*index];
                state.merge_section(
                    &section.name,
                    FieldMap::from([(section.fields[0].name.clone(), json!("value"))]),
                );
            }
            state
        }

        proptest! {
            #[test]
            fn canonical_name_and_alias_report_identically(value in "[a-zA-Z0-9 ]{1,24}") {
                let section = required_section();
                let by_name =
                    FieldMap::from([("letter_date".to_string(), json!(value.clone()))]);
                let by_alias = FieldMap::from([("letterDate".to_string(), json!(value))]);
                prop_assert_eq!(
                    section_report(&section, Some(&by_name)),
                    section_report(&section, Some(&by_alias))
                );
            }

            #[test]
            fn optional_values_alone_never_complete_a_required_section(
                number in "[0-9]{1,6}",
            ) {
                let section = required_section();
                let data = FieldMap::from([("letter_number".to_string(), json!(number))]);
                let report = section_report(&section, Some(&data));
                prop_assert!(!report.complete);
                prop_assert_eq!(
                    report.missing_required,
                    vec!["letter_date".to_string(), "subject".to_string()]
                );
            }

            #[test]
            fn scan_finds_the_first_unfilled_section_in_declared_order(
                filled in proptest::collection::btree_set(0usize..3, 0..=3),
            ) {
                let doc = flow();
                let state = state_with_filled(&doc, &filled);
                let expected = (0..doc.sections.len())
                    .find(|i| !filled.contains(i))
                    .map(|i| doc.sections[i].name.as_str());
                let next = next_incomplete_section(&doc, &state).map(|s| s.name.as_str());
                prop_assert_eq!(next, expected);
            }

            #[test]
            fn scan_is_deterministic(
                filled in proptest::collection::btree_set(0usize..3, 0..=3),
            ) {
                let doc = flow();
                let state = state_with_filled(&doc, &filled);
                let first = next_incomplete_section(&doc, &state).map(|s| s.name.clone());
                let second = next_incomplete_section(&doc, &state).map(|s| s.name.clone());
                prop_assert_eq!(first, second);
            }
        }
    }
}
