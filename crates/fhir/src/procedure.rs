//! CareConnect Procedure wire model.

use crate::datatypes::{Annotation, CodeableConcept, Meta, Reference};
use serde::{Deserialize, Serialize};

/// CareConnect Procedure profile.
pub const PROCEDURE_PROFILE: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/CareConnect-Procedure-1";

/// Who performed the procedure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedurePerformer {
    pub actor: Reference,
}

/// Procedure resource document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: String,

    pub meta: Meta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_date_time: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<ProcedurePerformer>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub note: Vec<Annotation>,
}

impl Procedure {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Meta::with_profile(PROCEDURE_PROFILE),
            status: None,
            code: None,
            subject: None,
            performed_date_time: None,
            performer: Vec::new(),
            note: Vec::new(),
        }
    }
}
