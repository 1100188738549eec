//! OperationOutcome error documents.
//!
//! Every failure the listener reports reaches the client as one of these, never as a bare
//! error string or an empty body.

use crate::datatypes::CodeableConcept;
use crate::FhirResult;
use serde::{Deserialize, Serialize};

/// FHIR issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

/// FHIR issue type (the subset this listener reports).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    Invalid,
    NotSupported,
    NotFound,
    Transient,
    Exception,
}

/// A single issue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcomeIssue {
    pub severity: IssueSeverity,

    pub code: IssueType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

/// Error document returned in place of a resource or bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    pub issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcome {
    /// An outcome with exactly one issue.
    pub fn single(
        severity: IssueSeverity,
        code: IssueType,
        diagnostics: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: "OperationOutcome".to_string(),
            issue: vec![OperationOutcomeIssue {
                severity,
                code,
                details: None,
                diagnostics: Some(diagnostics.into()),
            }],
        }
    }

    /// Attach underlying error detail to every issue.
    pub fn with_details(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        for issue in &mut self.issue {
            issue.details = Some(CodeableConcept {
                coding: Vec::new(),
                text: Some(text.clone()),
            });
        }
        self
    }

    /// Render the outcome as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError::Json`] if serialisation fails.
    pub fn render(&self) -> FhirResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
