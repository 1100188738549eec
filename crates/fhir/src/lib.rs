//! FHIR wire models for the SIDeR shared care record listener.
//!
//! This crate provides the **output documents** produced by the listener:
//! - CareConnect STU3 resources (Patient, Condition, Encounter, Flag, Procedure, Appointment)
//! - the [`Resource`] sum type with its `resourceType` discriminant
//! - searchset [`Bundle`]s and [`OperationOutcome`] error documents
//! - visibility tags read by the downstream viewer
//!
//! This crate focuses on:
//! - structural alignment with the CareConnect profiles
//! - JSON serialisation (absent members and empty arrays are never written)
//!
//! It knows nothing about database rows or search parameters; mapping from rows lives in
//! `sider-core`.

pub mod appointment;
pub mod bundle;
pub mod condition;
pub mod datatypes;
pub mod encounter;
pub mod flag;
pub mod operation_outcome;
pub mod patient;
pub mod procedure;
pub mod resource;
pub mod visibility;

// Re-export resource documents
pub use appointment::Appointment;
pub use condition::Condition;
pub use encounter::Encounter;
pub use flag::Flag;
pub use patient::Patient;
pub use procedure::Procedure;
pub use resource::Resource;

// Re-export envelopes
pub use bundle::{Bundle, BundleEntry, BundleLink};
pub use operation_outcome::{IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
pub use visibility::VisibilityTag;

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
