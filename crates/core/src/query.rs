//! Query building and dispatch.
//!
//! A request is turned into a [`ResourceQuery`]: the named stored procedure for the resource
//! kind and mode, plus a single filter parameter. Execution is delegated to a
//! [`QueryExecutor`], the seam behind which the database (or a fixture file) lives.
//!
//! The query table is static. `(kind, mode)` combinations without a procedure have no data
//! source, which is reported separately from a query that simply matched nothing.

use crate::error::SearchError;
use crate::resource_kind::ResourceKind;
use crate::row::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Query model
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Search,
    Read,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Search => f.write_str("search"),
            QueryMode::Read => f.write_str("read"),
        }
    }
}

/// The one named parameter passed to a stored procedure besides the API key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterParam {
    pub name: &'static str,
    pub value: String,
}

impl FilterParam {
    /// Render as `@name='value'`, doubling embedded single quotes.
    pub fn fragment(&self) -> String {
        format!("@{}={}", self.name, quote_literal(&self.value))
    }
}

/// A fully resolved named query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceQuery {
    pub kind: ResourceKind,
    pub mode: QueryMode,
    pub procedure: &'static str,
    pub filter: FilterParam,
}

impl ResourceQuery {
    /// The statement sent to the database.
    pub fn statement(&self, api_key: &str) -> String {
        format!(
            "EXECUTE [dbo].[{}] @apiKey = {}, {}",
            self.procedure,
            quote_literal(api_key),
            self.filter.fragment()
        )
    }

    /// The statement with the API key masked, for logs.
    pub fn redacted_statement(&self) -> String {
        format!(
            "EXECUTE [dbo].[{}] @apiKey = '<redacted>', {}",
            self.procedure,
            self.filter.fragment()
        )
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

// ============================================================================
// Execution seam
// ============================================================================

/// Failures raised by a query executor.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("query execution failed: {0}")]
    Execution(String),
    #[error("failed to read result row: {0}")]
    Row(String),
}

/// Forward-only cursor over result rows.
pub type RowCursor = Box<dyn Iterator<Item = Result<Row, QueryError>> + Send>;

/// Runs named queries. Implementations own connection management and caching.
pub trait QueryExecutor: Send + Sync {
    /// Execute `query`, authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the query cannot be run. Failures while reading individual
    /// rows are reported through the cursor.
    fn execute(&self, query: &ResourceQuery, api_key: &str) -> Result<RowCursor, QueryError>;
}

// ============================================================================
// Builder
// ============================================================================

const PATIENT_IDENTIFIER_PARAMS: &[&str] = &["identifier"];
const CLINICAL_IDENTIFIER_PARAMS: &[&str] = &["patient.identifier"];

/// Filter parameters accepted for searches of `kind`.
pub fn supported_parameters(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Patient => PATIENT_IDENTIFIER_PARAMS,
        ResourceKind::Condition
        | ResourceKind::Encounter
        | ResourceKind::Flag
        | ResourceKind::Procedure
        | ResourceKind::Appointment => CLINICAL_IDENTIFIER_PARAMS,
    }
}

/// Stored procedure serving `(kind, mode)`, if there is one.
pub fn named_query(kind: ResourceKind, mode: QueryMode) -> Option<&'static str> {
    use QueryMode::{Read, Search};
    use ResourceKind::*;

    match (kind, mode) {
        (Condition, Search) => Some("sp_FHIR_IMS_Conditions"),
        (Condition, Read) => Some("sp_FHIR_IMS_Condition_Read"),
        (Encounter, Search) => Some("sp_FHIR_IMS_Encounter"),
        (Encounter, Read) => Some("sp_FHIR_IMS_Encounter_Read"),
        (Flag, Search) => Some("sp_FHIR_IMS_Flags"),
        (Flag, Read) => Some("sp_FHIR_IMS_Flag_Read"),
        (Procedure, Search) => Some("sp_FHIR_IMS_Procedures"),
        (Patient, Search) => Some("sp_FHIR_IMS_Patient"),
        (Patient, Read) => Some("sp_FHIR_IMS_Patient_MRN"),
        (Procedure, Read) | (Appointment, _) => None,
    }
}

/// Builds queries for one organisation's patient-identifier namespace.
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    patient_id_system: String,
}

impl QueryBuilder {
    pub fn new(patient_id_system: impl Into<String>) -> Self {
        Self {
            patient_id_system: patient_id_system.into(),
        }
    }

    /// Reject the first parameter not accepted for `kind`. Names compare case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnsupportedParameter`] naming the offending parameter.
    pub fn validate(&self, kind: ResourceKind, params: &[(String, String)]) -> Result<(), SearchError> {
        let supported = supported_parameters(kind);
        match params
            .iter()
            .find(|(name, _)| !supported.iter().any(|s| s.eq_ignore_ascii_case(name)))
        {
            Some((name, _)) => Err(SearchError::UnsupportedParameter(name.clone())),
            None => Ok(()),
        }
    }

    /// Build the search query for `kind` from request parameters.
    ///
    /// Identifier values must be `system|code` with `system` equal to the configured patient
    /// namespace; anything else yields an empty filter value.
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnsupportedParameter`] for a parameter not accepted for `kind`
    /// - [`SearchError::EmptyFilterResult`] when no concrete filter value can be derived
    /// - [`SearchError::NoDataSource`] when `kind` has no search procedure
    pub fn build_search(
        &self,
        kind: ResourceKind,
        params: &[(String, String)],
    ) -> Result<ResourceQuery, SearchError> {
        self.validate(kind, params)?;

        let code = params
            .iter()
            .find_map(|(_, value)| self.identifier_code(value))
            .unwrap_or_default();
        if code.is_empty() {
            return Err(SearchError::EmptyFilterResult);
        }

        let procedure = named_query(kind, QueryMode::Search).ok_or(SearchError::NoDataSource {
            resource_type: kind.resource_type(),
            mode: QueryMode::Search,
        })?;

        Ok(ResourceQuery {
            kind,
            mode: QueryMode::Search,
            procedure,
            filter: FilterParam {
                name: "nhsNum",
                value: code,
            },
        })
    }

    /// Build the read query for one resource id.
    ///
    /// # Errors
    ///
    /// - [`SearchError::EmptyFilterResult`] when `id` is blank
    /// - [`SearchError::NoDataSource`] when `kind` has no read procedure
    pub fn build_read(&self, kind: ResourceKind, id: &str) -> Result<ResourceQuery, SearchError> {
        let procedure = named_query(kind, QueryMode::Read).ok_or(SearchError::NoDataSource {
            resource_type: kind.resource_type(),
            mode: QueryMode::Read,
        })?;

        let id = id.trim();
        if id.is_empty() {
            return Err(SearchError::EmptyFilterResult);
        }

        let name = match kind {
            ResourceKind::Patient => "mrn",
            _ => "id",
        };
        Ok(ResourceQuery {
            kind,
            mode: QueryMode::Read,
            procedure,
            filter: FilterParam {
                name,
                value: id.to_owned(),
            },
        })
    }

    /// Extract `code` from `system|code` when `system` is the configured namespace.
    ///
    /// Only the second segment is the code; anything after a further `|` is dropped.
    fn identifier_code(&self, value: &str) -> Option<String> {
        let mut segments = value.split('|');
        let system = segments.next()?;
        let code = segments.next()?;
        (system == self.patient_id_system && !code.is_empty()).then(|| code.to_owned())
    }
}
