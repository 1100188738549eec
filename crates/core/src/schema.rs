//! Typed row schemas, one per resource kind.
//!
//! Each schema lists the columns its stored procedure returns. Every column goes through
//! [`sider_types::present`], so empty strings and nulls arrive here as `None` and numeric columns
//! arrive as their string form. Only the identifier column is required; any other column may be
//! missing from the row entirely without failing the decode.
//!
//! Column names are the upstream names and are therefore kept verbatim via `rename`.

use crate::error::CoreResult;
use crate::resource_kind::ResourceKind;
use crate::row::Row;
use serde::Deserialize;
use sider_types::NonEmptyText;

// ============================================================================
// Patient
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PatientRow {
    #[serde(rename = "MRN", deserialize_with = "sider_types::present::required")]
    pub mrn: NonEmptyText,

    #[serde(rename = "NHS", default, deserialize_with = "sider_types::present::optional")]
    pub nhs_number: Option<String>,

    #[serde(rename = "NHS_Verified", default, deserialize_with = "sider_types::present::optional")]
    pub nhs_verified: Option<String>,

    #[serde(rename = "nhsNumberTraceStatusDesc", default, deserialize_with = "sider_types::present::optional")]
    pub nhs_trace_status_desc: Option<String>,

    #[serde(rename = "dod", default, deserialize_with = "sider_types::present::optional")]
    pub date_of_death: Option<String>,

    #[serde(rename = "Sex", default, deserialize_with = "sider_types::present::optional")]
    pub sex: Option<String>,

    #[serde(rename = "PT_Surname", default, deserialize_with = "sider_types::present::optional")]
    pub surname: Option<String>,

    #[serde(rename = "PT_Forename", default, deserialize_with = "sider_types::present::optional")]
    pub forename: Option<String>,

    #[serde(rename = "Title", default, deserialize_with = "sider_types::present::optional")]
    pub title: Option<String>,

    #[serde(rename = "dob", default, deserialize_with = "sider_types::present::optional")]
    pub date_of_birth: Option<String>,

    #[serde(rename = "addressline1", default, deserialize_with = "sider_types::present::optional")]
    pub address_line1: Option<String>,

    #[serde(rename = "addressline2", default, deserialize_with = "sider_types::present::optional")]
    pub address_line2: Option<String>,

    #[serde(rename = "addressline3", default, deserialize_with = "sider_types::present::optional")]
    pub address_line3: Option<String>,

    #[serde(rename = "addressline4", default, deserialize_with = "sider_types::present::optional")]
    pub address_line4: Option<String>,

    #[serde(rename = "addressline5", default, deserialize_with = "sider_types::present::optional")]
    pub address_line5: Option<String>,

    #[serde(rename = "postcode", default, deserialize_with = "sider_types::present::optional")]
    pub postcode: Option<String>,

    #[serde(rename = "Last_Updated", default, deserialize_with = "sider_types::present::optional")]
    pub last_updated: Option<String>,

    /// Next of kin: `system,code,display,given,family,phone|...`
    #[serde(rename = "FHIRNOKs", default, deserialize_with = "sider_types::present::optional")]
    pub next_of_kin: Option<String>,

    #[serde(rename = "Home_Number", default, deserialize_with = "sider_types::present::optional")]
    pub home_number: Option<String>,

    #[serde(rename = "Work_Number", default, deserialize_with = "sider_types::present::optional")]
    pub work_number: Option<String>,

    #[serde(rename = "ethnicCode", default, deserialize_with = "sider_types::present::optional")]
    pub ethnic_code: Option<String>,

    #[serde(rename = "ethnicText", default, deserialize_with = "sider_types::present::optional")]
    pub ethnic_text: Option<String>,

    #[serde(rename = "maritalStatusCode", default, deserialize_with = "sider_types::present::optional")]
    pub marital_status_code: Option<String>,

    #[serde(rename = "maritalStatusDesc", default, deserialize_with = "sider_types::present::optional")]
    pub marital_status_desc: Option<String>,

    /// "Do not distribute patient address" alert.
    #[serde(rename = "DND", default, deserialize_with = "sider_types::present::optional")]
    pub do_not_distribute: Option<String>,
}

// ============================================================================
// Condition
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ConditionRow {
    #[serde(rename = "PTdiagnosisID", deserialize_with = "sider_types::present::required")]
    pub diagnosis_id: NonEmptyText,

    #[serde(rename = "MRN", default, deserialize_with = "sider_types::present::optional")]
    pub mrn: Option<String>,

    #[serde(rename = "clinicalStatus", default, deserialize_with = "sider_types::present::optional")]
    pub clinical_status: Option<String>,

    #[serde(rename = "snomedCode", default, deserialize_with = "sider_types::present::optional")]
    pub snomed_code: Option<String>,

    #[serde(rename = "diagnosisName", default, deserialize_with = "sider_types::present::optional")]
    pub diagnosis_name: Option<String>,

    #[serde(rename = "dateOnset", default, deserialize_with = "sider_types::present::optional")]
    pub date_onset: Option<String>,

    #[serde(rename = "authHCP", default, deserialize_with = "sider_types::present::optional")]
    pub authorising_hcp: Option<String>,

    #[serde(rename = "authdate", default, deserialize_with = "sider_types::present::optional")]
    pub authorised_date: Option<String>,

    #[serde(rename = "resolvedDate", default, deserialize_with = "sider_types::present::optional")]
    pub resolved_date: Option<String>,

    #[serde(rename = "Last_Updated", default, deserialize_with = "sider_types::present::optional")]
    pub last_updated: Option<String>,
}

// ============================================================================
// Encounter
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EncounterRow {
    #[serde(rename = "Encounter_ID", deserialize_with = "sider_types::present::required")]
    pub encounter_id: NonEmptyText,

    #[serde(rename = "MRN", default, deserialize_with = "sider_types::present::optional")]
    pub mrn: Option<String>,

    #[serde(rename = "status", default, deserialize_with = "sider_types::present::optional")]
    pub status: Option<String>,

    #[serde(rename = "Last_Updated", default, deserialize_with = "sider_types::present::optional")]
    pub last_updated: Option<String>,

    #[serde(rename = "classCode", default, deserialize_with = "sider_types::present::optional")]
    pub class_code: Option<String>,

    #[serde(rename = "className", default, deserialize_with = "sider_types::present::optional")]
    pub class_name: Option<String>,

    #[serde(rename = "encounterClassCode", default, deserialize_with = "sider_types::present::optional")]
    pub location_class_code: Option<String>,

    #[serde(rename = "Start_Date", default, deserialize_with = "sider_types::present::optional")]
    pub start_date: Option<String>,

    #[serde(rename = "End_Date", default, deserialize_with = "sider_types::present::optional")]
    pub end_date: Option<String>,

    /// Encounter types: `system,code,display|...`
    #[serde(rename = "encountertype", default, deserialize_with = "sider_types::present::optional")]
    pub encounter_types: Option<String>,

    #[serde(rename = "Service_Code", default, deserialize_with = "sider_types::present::optional")]
    pub service_code: Option<String>,

    #[serde(rename = "Service", default, deserialize_with = "sider_types::present::optional")]
    pub service: Option<String>,

    #[serde(rename = "encounterParticipantIndividualCode_admitting", default, deserialize_with = "sider_types::present::optional")]
    pub admitting_code: Option<String>,

    #[serde(rename = "encounterParticipantIndividualDisplay_admitting", default, deserialize_with = "sider_types::present::optional")]
    pub admitting_display: Option<String>,

    #[serde(rename = "encounterParticipantIndividualCode_discharging", default, deserialize_with = "sider_types::present::optional")]
    pub discharging_code: Option<String>,

    #[serde(rename = "encounterParticipantIndividualDisplay_discharging", default, deserialize_with = "sider_types::present::optional")]
    pub discharging_display: Option<String>,

    #[serde(rename = "encounterParticipantIndividualCode_opattending", default, deserialize_with = "sider_types::present::optional")]
    pub attending_code: Option<String>,

    #[serde(rename = "encounterParticipantIndividualDisplay_opattending", default, deserialize_with = "sider_types::present::optional")]
    pub attending_display: Option<String>,

    #[serde(rename = "encounterAdmissionmethodCodingCode", default, deserialize_with = "sider_types::present::optional")]
    pub admission_method_code: Option<String>,

    #[serde(rename = "encounterAdmissionmethodCodingDesc", default, deserialize_with = "sider_types::present::optional")]
    pub admission_method_desc: Option<String>,

    #[serde(rename = "encounterDischargemethodCodingCode", default, deserialize_with = "sider_types::present::optional")]
    pub discharge_method_code: Option<String>,

    #[serde(rename = "encounterDischargemethodCodingDesc", default, deserialize_with = "sider_types::present::optional")]
    pub discharge_method_desc: Option<String>,

    #[serde(rename = "encounterHospitalizationAdmitsourceCodingCode", default, deserialize_with = "sider_types::present::optional")]
    pub admit_source_code: Option<String>,

    #[serde(rename = "encounterHospitalizationAdmitsourceCodingDesc", default, deserialize_with = "sider_types::present::optional")]
    pub admit_source_desc: Option<String>,

    #[serde(rename = "encounterHospitalizationDischargedispositionCodingCode", default, deserialize_with = "sider_types::present::optional")]
    pub discharge_disposition_code: Option<String>,

    #[serde(rename = "encounterHospitalizationDischargedispositionCodingDesc", default, deserialize_with = "sider_types::present::optional")]
    pub discharge_disposition_desc: Option<String>,

    #[serde(rename = "encounterLocation1Identifier", default, deserialize_with = "sider_types::present::optional")]
    pub admitting_ward_id: Option<String>,

    #[serde(rename = "encounterLocation1Display", default, deserialize_with = "sider_types::present::optional")]
    pub admitting_ward_display: Option<String>,

    #[serde(rename = "encounterLocation2Identifier", default, deserialize_with = "sider_types::present::optional")]
    pub discharge_ward_id: Option<String>,

    #[serde(rename = "encounterLocation2Display", default, deserialize_with = "sider_types::present::optional")]
    pub discharge_ward_display: Option<String>,
}

// ============================================================================
// Flag
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FlagRow {
    #[serde(rename = "PT_alertID", deserialize_with = "sider_types::present::required")]
    pub alert_id: NonEmptyText,

    #[serde(rename = "MRN", default, deserialize_with = "sider_types::present::optional")]
    pub mrn: Option<String>,

    #[serde(rename = "status", default, deserialize_with = "sider_types::present::optional")]
    pub status: Option<String>,

    #[serde(rename = "alertCatID", default, deserialize_with = "sider_types::present::optional")]
    pub category_id: Option<String>,

    #[serde(rename = "alertCat", default, deserialize_with = "sider_types::present::optional")]
    pub category: Option<String>,

    #[serde(rename = "snomed", default, deserialize_with = "sider_types::present::optional")]
    pub snomed_code: Option<String>,

    #[serde(rename = "localID", default, deserialize_with = "sider_types::present::optional")]
    pub local_code: Option<String>,

    #[serde(rename = "alert", default, deserialize_with = "sider_types::present::optional")]
    pub alert: Option<String>,

    #[serde(rename = "started", default, deserialize_with = "sider_types::present::optional")]
    pub started: Option<String>,

    #[serde(rename = "ended", default, deserialize_with = "sider_types::present::optional")]
    pub ended: Option<String>,

    #[serde(rename = "Last_Updated", default, deserialize_with = "sider_types::present::optional")]
    pub last_updated: Option<String>,
}

// ============================================================================
// Procedure
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProcedureRow {
    #[serde(rename = "procedureID", deserialize_with = "sider_types::present::required")]
    pub procedure_id: NonEmptyText,

    #[serde(rename = "MRN", default, deserialize_with = "sider_types::present::optional")]
    pub mrn: Option<String>,

    #[serde(rename = "status", default, deserialize_with = "sider_types::present::optional")]
    pub status: Option<String>,

    /// Procedure codes: `system,code,display|...`
    #[serde(rename = "proceduretype", default, deserialize_with = "sider_types::present::optional")]
    pub procedure_types: Option<String>,

    #[serde(rename = "procedureDatetime", default, deserialize_with = "sider_types::present::optional")]
    pub performed: Option<String>,

    #[serde(rename = "clinicanName", default, deserialize_with = "sider_types::present::optional")]
    pub clinician_name: Option<String>,

    #[serde(rename = "procedureNote", default, deserialize_with = "sider_types::present::optional")]
    pub note: Option<String>,

    #[serde(rename = "Last_Updated", default, deserialize_with = "sider_types::present::optional")]
    pub last_updated: Option<String>,
}

// ============================================================================
// Appointment
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AppointmentRow {
    #[serde(rename = "bookingID", deserialize_with = "sider_types::present::required")]
    pub booking_id: NonEmptyText,

    #[serde(rename = "MRN", default, deserialize_with = "sider_types::present::optional")]
    pub mrn: Option<String>,

    #[serde(rename = "status", default, deserialize_with = "sider_types::present::optional")]
    pub status: Option<String>,

    /// Specialties: `system,code,display|...`
    #[serde(rename = "specialties", default, deserialize_with = "sider_types::present::optional")]
    pub specialties: Option<String>,

    #[serde(rename = "NSCType", default, deserialize_with = "sider_types::present::optional")]
    pub specialty_system: Option<String>,

    #[serde(rename = "NSC", default, deserialize_with = "sider_types::present::optional")]
    pub specialty_code: Option<String>,

    #[serde(rename = "specialtyName", default, deserialize_with = "sider_types::present::optional")]
    pub specialty_name: Option<String>,

    /// Service types: `system,code,display|...`
    #[serde(rename = "serviceTypes", default, deserialize_with = "sider_types::present::optional")]
    pub service_types: Option<String>,

    #[serde(rename = "NTCType", default, deserialize_with = "sider_types::present::optional")]
    pub service_system: Option<String>,

    #[serde(rename = "NTC", default, deserialize_with = "sider_types::present::optional")]
    pub service_code: Option<String>,

    #[serde(rename = "serviceName", default, deserialize_with = "sider_types::present::optional")]
    pub service_name: Option<String>,

    #[serde(rename = "priorityValue", default, deserialize_with = "sider_types::present::optional")]
    pub priority: Option<String>,

    #[serde(rename = "Start_Date", default, deserialize_with = "sider_types::present::optional")]
    pub start_date: Option<String>,

    #[serde(rename = "End_Date", default, deserialize_with = "sider_types::present::optional")]
    pub end_date: Option<String>,

    #[serde(rename = "duration", default, deserialize_with = "sider_types::present::optional")]
    pub duration: Option<String>,

    #[serde(rename = "listOwner", default, deserialize_with = "sider_types::present::optional")]
    pub list_owner: Option<String>,

    #[serde(rename = "cancelReason", default, deserialize_with = "sider_types::present::optional")]
    pub cancel_reason: Option<String>,

    #[serde(rename = "Last_Updated", default, deserialize_with = "sider_types::present::optional")]
    pub last_updated: Option<String>,
}

// ============================================================================
// Sum type
// ============================================================================

/// A row decoded against the schema of its resource kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClinicalRow {
    Patient(PatientRow),
    Condition(ConditionRow),
    Encounter(EncounterRow),
    Flag(FlagRow),
    Procedure(ProcedureRow),
    Appointment(AppointmentRow),
}

impl ClinicalRow {
    /// Validate `row` against the schema for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::RowSchema`] if the row cannot be read as that kind.
    pub fn decode(kind: ResourceKind, row: &Row) -> CoreResult<Self> {
        let resource_type = kind.resource_type();
        Ok(match kind {
            ResourceKind::Patient => ClinicalRow::Patient(row.decode(resource_type)?),
            ResourceKind::Condition => ClinicalRow::Condition(row.decode(resource_type)?),
            ResourceKind::Encounter => ClinicalRow::Encounter(row.decode(resource_type)?),
            ResourceKind::Flag => ClinicalRow::Flag(row.decode(resource_type)?),
            ResourceKind::Procedure => ClinicalRow::Procedure(row.decode(resource_type)?),
            ResourceKind::Appointment => ClinicalRow::Appointment(row.decode(resource_type)?),
        })
    }
}
