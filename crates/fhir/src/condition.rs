//! CareConnect Condition wire model.

use crate::datatypes::{CodeableConcept, Meta, Reference};
use serde::{Deserialize, Serialize};

/// CareConnect Condition profile.
pub const CONDITION_PROFILE: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/CareConnect-Condition-1";

/// Condition (diagnosis) resource document.
///
/// Onset is a choice type: `onsetDateTime` when a real date was recorded, `onsetString` when the
/// source system only knows that it was not recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: String,

    pub meta: Meta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset_date_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset_string: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub abatement_date_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub asserted_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub asserter: Option<Reference>,
}

impl Condition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Meta::with_profile(CONDITION_PROFILE),
            clinical_status: None,
            code: None,
            subject: None,
            onset_date_time: None,
            onset_string: None,
            abatement_date_time: None,
            asserted_date: None,
            asserter: None,
        }
    }
}
