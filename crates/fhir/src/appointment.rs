//! CareConnect Appointment wire model.

use crate::datatypes::{CodeableConcept, Extension, Meta, Reference};
use serde::{Deserialize, Serialize};

/// CareConnect Appointment profile.
pub const APPOINTMENT_PROFILE: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/CareConnect-Appointment-1";

/// Extension recording why an appointment was cancelled.
pub const CANCELLATION_REASON_EXTENSION: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/Extension-CareConnect-AppointmentCancellationReason-1";

/// Participation status of an appointment participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipationStatus {
    Accepted,
    Declined,
    Tentative,
    NeedsAction,
}

/// A participant in an appointment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentParticipant {
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub participant_type: Vec<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Reference>,

    pub status: ParticipationStatus,
}

/// Appointment resource document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,

    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_type: Vec<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specialty: Vec<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_duration: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participant: Vec<AppointmentParticipant>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
}

impl Appointment {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Meta::with_profile(APPOINTMENT_PROFILE),
            extension: Vec::new(),
            status: None,
            service_type: Vec::new(),
            specialty: Vec::new(),
            priority: None,
            start: None,
            end: None,
            minutes_duration: None,
            participant: Vec::new(),
            subject: None,
        }
    }
}
