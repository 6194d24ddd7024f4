//! Built-in document type catalog.
//!
//! Assembled once at startup; callers share it through an `Arc`.

use once_cell::sync::Lazy;
use std::sync::Arc;

use super::document::DocumentTypeSchema;
use super::field::{FieldKind, FieldSpec};
use super::registry::SchemaRegistry;
use super::section::SectionSchema;

static DEFAULT_REGISTRY: Lazy<Arc<SchemaRegistry>> = Lazy::new(|| Arc::new(builtin_registry()));

/// Returns the shared registry holding the built-in document types.
pub fn default_registry() -> Arc<SchemaRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

/// Builds the registry of built-in document types.
pub fn builtin_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry
        .register(demand_letter())
        .expect("builtin catalog has no duplicate ids");
    registry
        .register(affidavit_of_loss())
        .expect("builtin catalog has no duplicate ids");
    registry.register_keywords(
        "demand_letter",
        ["demand letter", "letter of demand", "collection letter"],
    );
    registry.register_keywords(
        "affidavit_of_loss",
        ["affidavit of loss", "lost id", "nawalan ng id"],
    );
    registry
}

/// The demand letter document type.
fn demand_letter() -> DocumentTypeSchema {
    DocumentTypeSchema::new(
        "demand_letter",
        vec![
            SectionSchema::new(
                "basic_info",
                vec![
                    FieldSpec::required("letter_date", FieldKind::Str)
                        .with_alias("letterDate")
                        .with_description("the date the letter is issued"),
                    FieldSpec::optional("letter_number", FieldKind::Str)
                        .with_alias("letterNumber"),
                    FieldSpec::required("subject", FieldKind::Str)
                        .with_description("the subject line of the letter"),
                    FieldSpec::required(
                        "urgency",
                        FieldKind::choices(["Low", "Medium", "High", "Urgent"]),
                    ),
                    FieldSpec::required(
                        "category",
                        FieldKind::choices([
                            "Payment Demand",
                            "Contract Breach",
                            "Service Issue",
                            "Other",
                        ]),
                    ),
                ],
            ),
            SectionSchema::new(
                "sender_info",
                vec![
                    FieldSpec::required("name", FieldKind::Str)
                        .with_description("the full name of the sender"),
                    FieldSpec::optional("title", FieldKind::Str),
                    FieldSpec::optional("company", FieldKind::Str),
                    FieldSpec::optional("address", FieldKind::Str),
                    FieldSpec::optional("phone", FieldKind::Str),
                    FieldSpec::optional("email", FieldKind::Str),
                    FieldSpec::optional("signature", FieldKind::Str),
                ],
            ),
            SectionSchema::new(
                "recipient_info",
                vec![
                    FieldSpec::required("name", FieldKind::Str)
                        .with_description("the full name of the recipient"),
                    FieldSpec::optional("title", FieldKind::Str),
                    FieldSpec::optional("company", FieldKind::Str),
                    FieldSpec::optional("address", FieldKind::Str),
                    FieldSpec::optional("phone", FieldKind::Str),
                    FieldSpec::optional("email", FieldKind::Str),
                ],
            ),
            SectionSchema::new(
                "demand_info",
                vec![
                    FieldSpec::required("amount", FieldKind::Number)
                        .with_description("the amount being demanded"),
                    FieldSpec::required("currency", FieldKind::Str),
                    FieldSpec::optional("due_date", FieldKind::Str).with_alias("dueDate"),
                    FieldSpec::optional("original_due_date", FieldKind::Str)
                        .with_alias("originalDueDate"),
                    FieldSpec::optional("invoice_number", FieldKind::Str)
                        .with_alias("invoiceNumber"),
                    FieldSpec::optional("contract_number", FieldKind::Str)
                        .with_alias("contractNumber"),
                    FieldSpec::required("description", FieldKind::Str)
                        .with_description("what the demand is about"),
                    FieldSpec::optional("services_provided", FieldKind::StringList)
                        .with_alias("servicesProvided"),
                    FieldSpec::optional("payment_terms", FieldKind::Str)
                        .with_alias("paymentTerms"),
                ],
            ),
            SectionSchema::new(
                "legal_basis",
                vec![
                    FieldSpec::optional("contract_clause", FieldKind::Str)
                        .with_alias("contractClause"),
                    FieldSpec::optional("applicable_laws", FieldKind::StringList)
                        .with_alias("applicableLaws"),
                    FieldSpec::optional("previous_communications", FieldKind::StringList)
                        .with_alias("previousCommunications"),
                    FieldSpec::optional("evidence_documents", FieldKind::StringList)
                        .with_alias("evidenceDocuments"),
                ],
            ),
            SectionSchema::new(
                "demands",
                vec![
                    FieldSpec::required("primary_demand", FieldKind::Str)
                        .with_alias("primaryDemand")
                        .with_description("the main action being demanded"),
                    FieldSpec::optional("secondary_demands", FieldKind::StringList)
                        .with_alias("secondaryDemands"),
                    FieldSpec::optional("deadline", FieldKind::Str),
                    FieldSpec::optional("consequences", FieldKind::StringList),
                    FieldSpec::optional("remedies", FieldKind::StringList),
                ],
            ),
            SectionSchema::new(
                "additional_info",
                vec![
                    FieldSpec::optional("grace_period", FieldKind::Number)
                        .with_alias("gracePeriod"),
                    FieldSpec::optional("interest_rate", FieldKind::Number)
                        .with_alias("interestRate"),
                    FieldSpec::optional("late_fees", FieldKind::Number).with_alias("lateFees"),
                    FieldSpec::optional("collection_costs", FieldKind::Boolean)
                        .with_alias("collectionCosts"),
                    FieldSpec::optional("legal_action", FieldKind::Boolean)
                        .with_alias("legalAction"),
                    FieldSpec::optional("mediation", FieldKind::Boolean),
                    FieldSpec::optional("arbitration", FieldKind::Boolean),
                ],
            ),
            SectionSchema::new(
                "signature_info",
                vec![
                    FieldSpec::optional("notarized", FieldKind::Boolean),
                    FieldSpec::optional("witness_required", FieldKind::Boolean)
                        .with_alias("witnessRequired"),
                    FieldSpec::optional("witness_name", FieldKind::Str)
                        .with_alias("witnessName"),
                    FieldSpec::optional("witness_address", FieldKind::Str)
                        .with_alias("witnessAddress"),
                    FieldSpec::optional("notary_name", FieldKind::Str).with_alias("notaryName"),
                    FieldSpec::optional("notary_commission", FieldKind::Str)
                        .with_alias("notaryCommission"),
                    FieldSpec::optional("notary_expiry", FieldKind::Str)
                        .with_alias("notaryExpiry"),
                ],
            ),
            SectionSchema::new(
                "miscellaneous",
                vec![
                    FieldSpec::optional("attachments", FieldKind::StringList),
                    FieldSpec::optional("cc_recipients", FieldKind::StringList)
                        .with_alias("ccRecipients"),
                    FieldSpec::optional(
                        "delivery_method",
                        FieldKind::choices([
                            "Email",
                            "Registered Mail",
                            "Personal Delivery",
                            "Courier",
                        ]),
                    )
                    .with_alias("deliveryMethod"),
                    FieldSpec::optional("tracking_number", FieldKind::Str)
                        .with_alias("trackingNumber"),
                    FieldSpec::optional("notes", FieldKind::Str),
                ],
            ),
        ],
    )
}

/// The affidavit of loss document type.
fn affidavit_of_loss() -> DocumentTypeSchema {
    DocumentTypeSchema::new(
        "affidavit_of_loss",
        vec![
            SectionSchema::new(
                "affiant",
                vec![
                    FieldSpec::required("name", FieldKind::Str)
                        .with_description("the full name of the affiant"),
                    FieldSpec::required(
                        "civil_status",
                        FieldKind::choices([
                            "Single",
                            "Married",
                            "Widowed",
                            "Separated",
                            "Divorced",
                        ]),
                    )
                    .with_alias("civilStatus"),
                    FieldSpec::required("address", FieldKind::Str)
                        .with_description("the affiant's complete address"),
                ],
            ),
            SectionSchema::new(
                "lost_item",
                vec![
                    FieldSpec::required(
                        "item_type",
                        FieldKind::choices([
                            "Philippine Passport",
                            "Driver's License",
                            "National ID",
                            "Birth Certificate",
                            "TIN ID",
                            "SSS ID",
                            "Postal ID",
                            "PRC ID",
                            "School ID",
                            "Other",
                        ]),
                    )
                    .with_alias("itemType"),
                    FieldSpec::optional("other_item_type", FieldKind::Str)
                        .with_alias("otherItemType"),
                    FieldSpec::required("document_number", FieldKind::Str)
                        .with_alias("documentNumber")
                        .with_description("the serial or reference number of the lost document"),
                    FieldSpec::required("issue_place", FieldKind::Str).with_alias("issuePlace"),
                    FieldSpec::required("issue_date", FieldKind::Str).with_alias("issueDate"),
                ],
            ),
            SectionSchema::new(
                "loss_details",
                vec![
                    FieldSpec::required("discovery_date", FieldKind::Str)
                        .with_alias("discoveryDate")
                        .with_description("when the loss was discovered"),
                    FieldSpec::required("loss_location", FieldKind::Str)
                        .with_alias("lossLocation"),
                    FieldSpec::required("circumstances", FieldKind::Str)
                        .with_description("how the item was lost"),
                    FieldSpec::optional("police_report_filed", FieldKind::Boolean)
                        .with_alias("policeReportFiled"),
                ],
            ),
            SectionSchema::new(
                "purpose",
                vec![FieldSpec::optional("purpose", FieldKind::Str)
                    .with_description("what the affidavit will be used for")],
            ),
            SectionSchema::new(
                "witness_clause",
                vec![
                    FieldSpec::required("execution_date", FieldKind::Str)
                        .with_alias("executionDate"),
                    FieldSpec::required("execution_year", FieldKind::Str)
                        .with_alias("executionYear"),
                    FieldSpec::required("execution_place", FieldKind::Str)
                        .with_alias("executionPlace"),
                ],
            ),
            SectionSchema::new(
                "notary",
                vec![
                    FieldSpec::required("notary_location", FieldKind::Str)
                        .with_alias("notaryLocation"),
                    FieldSpec::required("notarization_day", FieldKind::Str)
                        .with_alias("notarizationDay"),
                    FieldSpec::required("notarization_month", FieldKind::Str)
                        .with_alias("notarizationMonth"),
                    FieldSpec::required("notarization_year", FieldKind::Str)
                        .with_alias("notarizationYear"),
                    FieldSpec::required("notarization_place", FieldKind::Str)
                        .with_alias("notarizationPlace"),
                    FieldSpec::required("affiant_id_type", FieldKind::Str)
                        .with_alias("affiantIdType"),
                    FieldSpec::required("affiant_id_issue_place", FieldKind::Str)
                        .with_alias("affiantIdIssuePlace"),
                    FieldSpec::required("affiant_id_issue_date", FieldKind::Str)
                        .with_alias("affiantIdIssueDate"),
                    FieldSpec::required("affiant_id_expiry_date", FieldKind::Str)
                        .with_alias("affiantIdExpiryDate"),
                    FieldSpec::optional("doc_no", FieldKind::Str).with_alias("docNo"),
                    FieldSpec::optional("service_no", FieldKind::Str).with_alias("serviceNo"),
                    FieldSpec::optional("or_no", FieldKind::Str).with_alias("orNo"),
                    FieldSpec::optional("fee_paid", FieldKind::Number).with_alias("feePaid"),
                ],
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_contains_demand_letter() {
        let reg = builtin_registry();
        let schema = reg.get("demand_letter").unwrap();
        assert_eq!(schema.sections.len(), 9);
        assert_eq!(schema.first_section().unwrap().name, "basic_info");
    }

    #[test]
    fn builtin_registry_contains_affidavit_of_loss() {
        let reg = builtin_registry();
        let schema = reg.get("affidavit_of_loss").unwrap();
        assert_eq!(schema.sections.len(), 6);
        assert_eq!(schema.first_section().unwrap().name, "affiant");
    }

    #[test]
    fn demand_letter_keyword_detection_works() {
        let reg = builtin_registry();
        assert_eq!(
            reg.detect_document_type("please draft a letter of demand"),
            Some("demand_letter")
        );
    }

    #[test]
    fn affidavit_keyword_detection_works() {
        let reg = builtin_registry();
        assert_eq!(
            reg.detect_document_type("I need an affidavit of loss for my passport"),
            Some("affidavit_of_loss")
        );
        assert_eq!(
            reg.detect_document_type("nawalan ng id po ako"),
            Some("affidavit_of_loss")
        );
    }

    #[test]
    fn purpose_section_is_all_optional() {
        let reg = builtin_registry();
        let section = reg
            .get("affidavit_of_loss")
            .unwrap()
            .section("purpose")
            .unwrap();
        assert!(!section.has_required_fields());
    }

    #[test]
    fn legal_basis_is_all_optional() {
        let reg = builtin_registry();
        let section = reg.get("demand_letter").unwrap().section("legal_basis").unwrap();
        assert!(!section.has_required_fields());
    }

    #[test]
    fn aliases_resolve_in_field_lookup() {
        let reg = builtin_registry();
        let basic = reg.get("demand_letter").unwrap().section("basic_info").unwrap();
        assert_eq!(basic.field("letterDate").unwrap().name, "letter_date");
    }

    #[test]
    fn default_registry_is_shared() {
        let a = default_registry();
        let b = default_registry();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
