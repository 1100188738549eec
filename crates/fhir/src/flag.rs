//! CareConnect Flag wire model.
//!
//! Flags are patient alerts (safeguarding, allergies recorded as alerts, access requirements).
//! Only alerts whose code is on the shared care record allow-list are surfaced in the viewer.

use crate::datatypes::{CodeableConcept, Meta, Period, Reference};
use serde::{Deserialize, Serialize};

/// CareConnect Flag profile.
pub const FLAG_PROFILE: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/CareConnect-Flag-1";

/// Flag (alert) resource document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flag {
    pub id: String,

    pub meta: Meta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CodeableConcept>,

    pub code: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl Flag {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Meta::with_profile(FLAG_PROFILE),
            status: None,
            category: None,
            code: CodeableConcept::default(),
            subject: None,
            period: None,
        }
    }
}
