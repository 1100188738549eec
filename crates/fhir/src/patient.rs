//! CareConnect Patient wire model.
//!
//! Represents patient demographics and identification as emitted to the shared care record.
//! Redacted patients (those flagged "do not distribute") carry no `telecom` or `address`
//! blocks and gain a restricted confidentiality label in `meta.security` instead.

use crate::datatypes::{
    Address, CodeableConcept, Coding, ContactPoint, Extension, HumanName, Identifier, Meta,
    Reference,
};
use serde::{Deserialize, Serialize};

/// CareConnect Patient profile.
pub const PATIENT_PROFILE: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/CareConnect-Patient-1";

/// Confidentiality system used for the "restricted" security label.
pub const CONFIDENTIALITY_SYSTEM: &str = "https://hl7.org/fhir/ValueSet/v3-Confidentiality";

/// Administrative gender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

/// A contact party for the patient (next of kin, switchboard, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContact {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationship: Vec<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<HumanName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Reference>,
}

/// Patient resource document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,

    pub meta: Meta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<AdministrativeGender>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_boolean: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contact: Vec<PatientContact>,
}

impl Patient {
    /// An otherwise empty patient with the profile already set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Meta::with_profile(PATIENT_PROFILE),
            language: None,
            extension: Vec::new(),
            identifier: Vec::new(),
            name: Vec::new(),
            telecom: Vec::new(),
            gender: None,
            birth_date: None,
            deceased_boolean: None,
            address: Vec::new(),
            marital_status: None,
            contact: Vec::new(),
        }
    }

    /// Strip contact details and label the resource as restricted.
    pub fn redact(&mut self) {
        self.telecom.clear();
        self.address.clear();
        self.meta.security = vec![Coding::fixed(CONFIDENTIALITY_SYSTEM, "R", "restricted")];
    }
}
