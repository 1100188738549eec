//! Constants used throughout the SIDeR core crate.
//!
//! Terminology systems and extension URLs are fixed by the CareConnect profiles and the
//! downstream viewer; configuration keys and defaults live here so the binaries and the
//! config layer agree on them.

// ============================================================================
// Configuration keys
// ============================================================================

pub const API_URL_KEY: &str = "SIDER_API_URL";
pub const API_KEY_KEY: &str = "SIDER_API_KEY";
pub const PATIENT_ID_SYSTEM_KEY: &str = "SIDER_PATIENT_ID_SYSTEM";
pub const FLAG_SNOMED_CODES_KEY: &str = "SIDER_FLAG_SNOMED_CODES";
pub const FLAG_LOCAL_CODES_KEY: &str = "SIDER_FLAG_LOCAL_CODES";
pub const RECENCY_WINDOW_DAYS_KEY: &str = "SIDER_RECENCY_WINDOW_DAYS";
pub const SWITCHBOARD_NAME_KEY: &str = "SIDER_SWITCHBOARD_NAME";
pub const SWITCHBOARD_PHONE_KEY: &str = "SIDER_SWITCHBOARD_PHONE";
pub const SWITCHBOARD_ORG_REFERENCE_KEY: &str = "SIDER_SWITCHBOARD_ORG_REFERENCE";
pub const SWITCHBOARD_ORG_DISPLAY_KEY: &str = "SIDER_SWITCHBOARD_ORG_DISPLAY";
pub const FIXTURE_FILE_KEY: &str = "SIDER_FIXTURE_FILE";

// ============================================================================
// Defaults
// ============================================================================

/// Organisation patient-identifier namespace.
pub const DEFAULT_PATIENT_ID_SYSTEM: &str = "https://fhir.nhs.uk/Id/nhs-number";

/// Encounters that started no more than this many days ago are shown in summary view.
pub const DEFAULT_RECENCY_WINDOW_DAYS: i64 = 30;

pub const DEFAULT_SWITCHBOARD_NAME: &str = "Musgrove Park Hospital Switchboard (24 Hours)";
pub const DEFAULT_SWITCHBOARD_PHONE: &str = "01823333444";
pub const DEFAULT_SWITCHBOARD_ORG_REFERENCE: &str =
    "https://directory.spineservices.nhs.uk/STU3/Organization/RBA";
pub const DEFAULT_SWITCHBOARD_ORG_DISPLAY: &str = "TAUNTON AND SOMERSET NHS FOUNDATION TRUST";

// ============================================================================
// Terminology
// ============================================================================

pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";
pub const LOCAL_CODE_SYSTEM: &str = "https://fhir.tst.nhs.uk";
pub const LOCAL_PATIENT_ID_SYSTEM: &str = "https://fhir.tst.nhs.uk/Id/local-patient-identifier";

pub const NHS_VERIFICATION_EXTENSION: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/Extension-CareConnect-NHSNumberVerificationStatus-1";
pub const NHS_VERIFICATION_SYSTEM: &str =
    "https://fhir.hl7.org.uk/STU3/CodeSystem/CareConnect-NHSNumberVerificationStatus-1";
/// Verification status assumed when the row carries none.
pub const NHS_UNTRACED_CODE: &str = "2";
pub const NHS_UNTRACED_DISPLAY: &str = "Number present but not traced";

pub const ETHNIC_CATEGORY_EXTENSION: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/Extension-CareConnect-EthnicCategory-1";
pub const ETHNIC_CATEGORY_SYSTEM: &str =
    "https://fhir.hl7.org.uk/STU3/CodeSystem/CareConnect-EthnicCategory-1";
pub const MARITAL_STATUS_SYSTEM: &str = "https://hl7.org/fhir/stu3/v3/MaritalStatus";
pub const PATIENT_LANGUAGE: &str = "English (Great Britain)";

/// Literal the PAS writes in place of an unknown onset date.
pub const ONSET_NOT_RECORDED: &str = "Not Recorded In PAS";

pub const ENCOUNTER_CLASS_SYSTEM: &str = "https://hl7.org/fhir/v3/ActEncounterCode";
pub const SPECIALTY_SYSTEM: &str = "https://fhir.nhs.uk/STU3/CodeSystem/Specialty-1";
pub const PARTICIPATION_TYPE_SYSTEM: &str = "https://hl7.org/fhir/v3/ParticipationType";
/// Inpatient encounters are the only ones that carry ward locations.
pub const INPATIENT_CLASS_CODE: &str = "IMP";

pub const ADMISSION_METHOD_EXTENSION: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/Extension-CareConnect-AdmissionMethod-1";
pub const ADMISSION_METHOD_SYSTEM: &str =
    "https://fhir.hl7.org.uk/STU3/ValueSet/CareConnect-AdmissionMethod-1";
pub const DISCHARGE_METHOD_EXTENSION: &str =
    "https://fhir.hl7.org.uk/STU3/StructureDefinition/Extension-CareConnect-DischargeMethod-1";
pub const DISCHARGE_METHOD_SYSTEM: &str =
    "https://fhir.hl7.org.uk/STU3/ValueSet/CareConnect-DischargeMethod-1";
pub const ADMIT_SOURCE_SYSTEM: &str =
    "https://fhir.hl7.org.uk/STU3/CodeSystem/CareConnect-SourceOfAdmission-1";
pub const DISCHARGE_DESTINATION_SYSTEM: &str =
    "https://fhir.hl7.org.uk/STU3/CodeSystem/CareConnect-DischargeDestination-1";

pub const APPOINTMENT_PARTICIPANT_TYPE_SYSTEM: &str =
    "https://www.hl7.org/fhir/valueset-encounter-participant-type.html";
pub const CANCELLED_STATUS: &str = "cancelled";
pub const PLANNED_STATUS: &str = "planned";
