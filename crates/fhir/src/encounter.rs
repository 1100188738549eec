//! CareConnect Encounter wire model.
//!
//! Encounters carry the richest structure of the SIDeR resources: role-based participants,
//! inpatient hospitalisation details and ward locations bound to the encounter period.

use crate::datatypes::{CodeableConcept, Coding, Extension, Meta, Period, Reference};
use serde::{Deserialize, Serialize};

/// CareConnect Encounter profile.
pub const ENCOUNTER_PROFILE: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/CareConnect-Encounter-1";

/// A participant in the encounter, typed by one or more participation roles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterParticipant {
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub participant_type: Vec<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual: Option<Reference>,
}

/// Admission and discharge details for inpatient stays.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospitalization {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admit_source: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discharge_disposition: Option<CodeableConcept>,
}

impl Hospitalization {
    pub fn is_empty(&self) -> bool {
        self.extension.is_empty() && self.admit_source.is_none() && self.discharge_disposition.is_none()
    }
}

/// A location the patient was at during the encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterLocation {
    pub location: Reference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

/// Encounter resource document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: String,

    pub meta: Meta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class: Option<Coding>,

    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub encounter_type: Vec<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participant: Vec<EncounterParticipant>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospitalization: Option<Hospitalization>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<EncounterLocation>,
}

impl Encounter {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Meta::with_profile(ENCOUNTER_PROFILE),
            status: None,
            class: None,
            encounter_type: Vec::new(),
            subject: None,
            participant: Vec::new(),
            period: None,
            hospitalization: None,
            location: Vec::new(),
        }
    }
}
