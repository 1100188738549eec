use crate::query::{QueryError, QueryMode};
use fhir::{IssueSeverity, IssueType, OperationOutcome};

/// Errors raised while configuring the listener or reading rows.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("missing required configuration value {0}")]
    MissingConfig(&'static str),
    #[error("invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },
    #[error("failed to read fixture file: {0}")]
    FixtureRead(#[source] std::io::Error),
    #[error("failed to parse fixture file: {0}")]
    FixtureParse(#[source] serde_json::Error),
    #[error("{resource_type} row does not match its schema at {path}: {message}")]
    RowSchema {
        resource_type: &'static str,
        path: String,
        message: String,
    },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Failures of a search or read request.
///
/// Every variant is reported to the client as an [`OperationOutcome`]; see
/// [`SearchError::to_operation_outcome`].
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("unsupported resource type {0}")]
    UnsupportedResourceType(String),
    #[error("unknown or unsupported parameter {0}")]
    UnsupportedParameter(String),
    #[error("no filter value could be derived from the request parameters")]
    EmptyFilterResult,
    #[error("no {mode} query is available for {resource_type}")]
    NoDataSource {
        resource_type: &'static str,
        mode: QueryMode,
    },
    #[error("data access failed: {0}")]
    DataAccess(#[from] QueryError),
    #[error("mapping failed: {0}")]
    Mapping(#[from] CoreError),
    #[error("{resource_type} {id} not found")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// HTTP status code reported with this failure.
    ///
    /// Every failure is a 500, including rejected parameters. The only exception is a read
    /// that found no row, which is a 404.
    pub fn status(&self) -> u16 {
        match self {
            SearchError::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Convert this failure into the error document returned to the client.
    ///
    /// `mode` selects the generic diagnostic used for failures that must not leak detail
    /// about which filter was at fault.
    pub fn to_operation_outcome(&self, mode: QueryMode) -> OperationOutcome {
        let generic = match mode {
            QueryMode::Search => "Error searching resources.",
            QueryMode::Read => "Error reading resource.",
        };

        match self {
            SearchError::UnsupportedParameter(name) => OperationOutcome::single(
                IssueSeverity::Error,
                IssueType::Invalid,
                format!("Unknown or unsupported parameter {name}."),
            ),
            SearchError::UnsupportedResourceType(name) => OperationOutcome::single(
                IssueSeverity::Error,
                IssueType::NotSupported,
                format!("Unsupported resource type {name}."),
            ),
            SearchError::EmptyFilterResult => {
                OperationOutcome::single(IssueSeverity::Error, IssueType::Transient, generic)
            }
            SearchError::NoDataSource { .. } => {
                OperationOutcome::single(IssueSeverity::Error, IssueType::NotSupported, generic)
                    .with_details(self.to_string())
            }
            SearchError::DataAccess(err) => {
                OperationOutcome::single(IssueSeverity::Error, IssueType::Transient, generic)
                    .with_details(err.to_string())
            }
            SearchError::Mapping(err) => {
                OperationOutcome::single(IssueSeverity::Error, IssueType::Transient, generic)
                    .with_details(err.to_string())
            }
            SearchError::NotFound { .. } => OperationOutcome::single(
                IssueSeverity::Error,
                IssueType::NotFound,
                self.to_string(),
            ),
        }
    }
}
