//! Search and read orchestration.
//!
//! This module drives a request end to end:
//!
//! ```text
//! validate -> build query -> execute -> (map row -> append entry)* -> finalise -> respond
//! ```
//!
//! Any failure along the way short-circuits to a single error document. Nothing is retried and
//! nothing is partially returned: one unreadable row fails the whole bundle.
//!
//! ## Collaborators
//!
//! The service holds no per-request state. Configuration is resolved once and shared behind an
//! `Arc`, and rows come from an injected [`QueryExecutor`], so the orchestrator can be exercised
//! without a database or an HTTP host.

use crate::config::CoreConfig;
use crate::error::{SearchError, SearchResult};
use crate::mappers::{map_row, MappingContext};
use crate::query::{QueryBuilder, QueryExecutor, QueryMode, ResourceQuery};
use crate::resource_kind::ResourceKind;
use chrono::NaiveDateTime;
use fhir::{Bundle, BundleEntry, FhirResult, OperationOutcome, Resource};
use serde::Serialize;
use std::sync::Arc;

/// Content type of every response body.
pub const FHIR_JSON: &str = "application/fhir+json";

/// A search as received from the host transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Resource type from the request path, any case.
    pub resource_type: String,
    /// Filter parameters in request order.
    pub parameters: Vec<(String, String)>,
    /// Path segment used to build entry `fullUrl`s, e.g. `/condition`.
    pub context_path: String,
    /// The incoming request URL, used as the bundle's self link.
    pub request_url: String,
}

/// A read of a single resource by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadRequest {
    pub resource_type: String,
    pub id: String,
}

/// Response payload: a bundle, a single resource, or an error document.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Bundle(Bundle),
    Resource(Resource),
    Outcome(OperationOutcome),
}

/// A status code and the body to send with it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FhirResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl FhirResponse {
    fn failure(err: &SearchError, mode: QueryMode) -> Self {
        Self {
            status: err.status(),
            body: ResponseBody::Outcome(err.to_operation_outcome(mode)),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Render the body as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`fhir::FhirError::Json`] if serialisation fails.
    pub fn render(&self) -> FhirResult<String> {
        Ok(serde_json::to_string(&self.body)?)
    }
}

/// Orchestrates searches and reads against one query executor.
#[derive(Clone)]
pub struct SearchService {
    cfg: Arc<CoreConfig>,
    executor: Arc<dyn QueryExecutor>,
    queries: QueryBuilder,
    now: Option<NaiveDateTime>,
}

impl SearchService {
    pub fn new(cfg: Arc<CoreConfig>, executor: Arc<dyn QueryExecutor>) -> Self {
        let queries = QueryBuilder::new(cfg.patient_id_system());
        Self {
            cfg,
            executor,
            queries,
            now: None,
        }
    }

    /// Pin the reference moment used by recency rules. Defaults to the local time of each request.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Run a search and return either a bundle (200) or an error document.
    pub fn search(&self, request: &SearchRequest) -> FhirResponse {
        tracing::info!(
            resource_type = %request.resource_type,
            parameters = request.parameters.len(),
            "search requested"
        );
        match self.try_search(request) {
            Ok(bundle) => {
                tracing::info!(
                    resource_type = %request.resource_type,
                    total = bundle.total,
                    "search completed"
                );
                FhirResponse {
                    status: 200,
                    body: ResponseBody::Bundle(bundle),
                }
            }
            Err(err) => {
                log_failure(&err, QueryMode::Search);
                FhirResponse::failure(&err, QueryMode::Search)
            }
        }
    }

    /// Read one resource by id and return it (200), or an error document.
    pub fn read(&self, request: &ReadRequest) -> FhirResponse {
        tracing::info!(
            resource_type = %request.resource_type,
            id = %request.id,
            "read requested"
        );
        match self.try_read(request) {
            Ok(resource) => FhirResponse {
                status: 200,
                body: ResponseBody::Resource(resource),
            },
            Err(err) => {
                log_failure(&err, QueryMode::Read);
                FhirResponse::failure(&err, QueryMode::Read)
            }
        }
    }

    fn try_search(&self, request: &SearchRequest) -> SearchResult<Bundle> {
        let kind = parse_kind(&request.resource_type)?;
        let query = self.queries.build_search(kind, &request.parameters)?;

        let ctx = MappingContext::new(&self.cfg, self.now());
        let mut bundle = Bundle::searchset();
        for resource in self.run(&query, &ctx)? {
            bundle.push(BundleEntry::new(
                self.cfg.api_url(),
                &request.context_path,
                resource?,
            ));
        }
        bundle.finalise(request.request_url.clone());
        Ok(bundle)
    }

    fn try_read(&self, request: &ReadRequest) -> SearchResult<Resource> {
        let kind = parse_kind(&request.resource_type)?;
        let query = self.queries.build_read(kind, &request.id)?;

        let ctx = MappingContext::new(&self.cfg, self.now());
        let first = self.run(&query, &ctx)?.next();
        match first {
            Some(resource) => resource,
            None => Err(SearchError::NotFound {
                resource_type: kind.resource_type(),
                id: request.id.clone(),
            }),
        }
    }

    /// Execute `query` and lazily map each row as it is pulled from the cursor.
    fn run<'a>(
        &'a self,
        query: &'a ResourceQuery,
        ctx: &'a MappingContext<'a>,
    ) -> SearchResult<impl Iterator<Item = SearchResult<Resource>> + 'a> {
        tracing::debug!(statement = %query.redacted_statement(), "executing named query");
        let cursor = self.executor.execute(query, self.cfg.api_key())?;

        Ok(cursor.enumerate().map(move |(index, row)| {
            let row = row?;
            tracing::debug!(row = index, columns = row.len(), "mapping row");
            Ok(map_row(query.kind, &row, ctx)?)
        }))
    }

    fn now(&self) -> NaiveDateTime {
        self.now
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

fn parse_kind(resource_type: &str) -> SearchResult<ResourceKind> {
    ResourceKind::parse(resource_type)
        .ok_or_else(|| SearchError::UnsupportedResourceType(resource_type.to_owned()))
}

fn log_failure(err: &SearchError, mode: QueryMode) {
    match err {
        SearchError::DataAccess(_) | SearchError::Mapping(_) => {
            tracing::error!(%mode, error = %err, "request failed");
        }
        _ => tracing::warn!(%mode, error = %err, "request rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryError, RowCursor};
    use crate::row::Row;
    use serde_json::Value;
    use std::sync::Mutex;

    const NHS_NUMBER: &str = "https://fhir.nhs.uk/Id/nhs-number|9999999999";
    const BASE: &str = "https://sider.example.nhs.uk/fhir";

    /// Records every statement it is asked to run and replays canned rows.
    struct StubExecutor {
        rows: Vec<Row>,
        fail: Option<String>,
        statements: Mutex<Vec<String>>,
    }

    impl StubExecutor {
        fn with_rows(rows: Vec<Row>) -> Arc<Self> {
            Arc::new(Self {
                rows,
                fail: None,
                statements: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                rows: Vec::new(),
                fail: Some(message.to_string()),
                statements: Mutex::new(Vec::new()),
            })
        }

        fn statements(&self) -> Vec<String> {
            self.statements.lock().expect("lock").clone()
        }
    }

    impl QueryExecutor for StubExecutor {
        fn execute(&self, query: &ResourceQuery, api_key: &str) -> Result<RowCursor, QueryError> {
            self.statements
                .lock()
                .expect("lock")
                .push(query.statement(api_key));
            if let Some(message) = &self.fail {
                return Err(QueryError::Execution(message.clone()));
            }
            Ok(Box::new(self.rows.clone().into_iter().map(Ok)))
        }
    }

    fn service(executor: Arc<StubExecutor>) -> SearchService {
        let cfg = Arc::new(CoreConfig::new(BASE, "test-key").expect("config"));
        SearchService::new(cfg, executor)
            .with_now(
                chrono::NaiveDate::from_ymd_opt(2024, 6, 30)
                    .and_then(|d| d.and_hms_opt(12, 0, 0))
                    .expect("timestamp"),
            )
    }

    fn search_request(resource_type: &str, params: &[(&str, &str)]) -> SearchRequest {
        SearchRequest {
            resource_type: resource_type.to_string(),
            parameters: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            context_path: format!("/{}", resource_type.to_lowercase()),
            request_url: format!("{BASE}/{}?patient.identifier=x", resource_type.to_lowercase()),
        }
    }

    fn body(response: &FhirResponse) -> Value {
        serde_json::to_value(&response.body).expect("serialise")
    }

    #[test]
    fn condition_search_returns_bundle_of_mapped_rows() {
        let executor = StubExecutor::with_rows(vec![
            Row::new().with("PTdiagnosisID", "C1").with("MRN", "100234"),
            Row::new().with("PTdiagnosisID", "C2").with("MRN", "100234"),
        ]);
        let response = service(executor.clone())
            .search(&search_request("Condition", &[("patient.identifier", NHS_NUMBER)]));

        assert_eq!(response.status, 200);
        let value = body(&response);
        assert_eq!(value["resourceType"], "Bundle");
        assert_eq!(value["total"], 2);
        assert_eq!(value["link"][0]["url"], format!("{BASE}/condition?patient.identifier=x"));

        let entries = value["entry"].as_array().expect("entries");
        assert_eq!(entries.len(), 2);
        for entry in entries {
            let id = entry["resource"]["id"].as_str().expect("id");
            assert_eq!(entry["resource"]["resourceType"], "Condition");
            assert!(entry["fullUrl"]
                .as_str()
                .is_some_and(|url| url.ends_with(&format!("/{id}"))));
        }
        assert_eq!(entries[0]["fullUrl"], format!("{BASE}/condition/C1"));

        let statements = executor.statements();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].contains("sp_FHIR_IMS_Conditions"));
        assert!(statements[0].contains("'9999999999'"));
    }

    #[test]
    fn empty_result_is_an_empty_bundle() {
        let response = service(StubExecutor::with_rows(Vec::new()))
            .search(&search_request("flag", &[("patient.identifier", NHS_NUMBER)]));
        assert_eq!(response.status, 200);
        let value = body(&response);
        assert_eq!(value["total"], 0);
        assert!(value.get("entry").is_none() || value["entry"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn unsupported_parameter_never_reaches_executor() {
        let executor = StubExecutor::with_rows(Vec::new());
        let response = service(executor.clone()).search(&search_request("patient", &[("foo", "1")]));

        assert_eq!(response.status, 500);
        let value = body(&response);
        assert_eq!(value["resourceType"], "OperationOutcome");
        assert_eq!(value["issue"][0]["code"], "invalid");
        assert_eq!(value["issue"][0]["diagnostics"], "Unknown or unsupported parameter foo.");
        assert!(executor.statements().is_empty());
    }

    #[test]
    fn unsupported_type_is_rejected() {
        let response = service(StubExecutor::with_rows(Vec::new()))
            .search(&search_request("Observation", &[]));
        assert_eq!(response.status, 500);
        assert_eq!(body(&response)["issue"][0]["code"], "not-supported");
    }

    #[test]
    fn foreign_identifier_is_a_transient_error() {
        let executor = StubExecutor::with_rows(Vec::new());
        let response = service(executor.clone()).search(&search_request(
            "encounter",
            &[("patient.identifier", "https://elsewhere|123")],
        ));
        assert_eq!(response.status, 500);
        let value = body(&response);
        assert_eq!(value["issue"][0]["code"], "transient");
        assert_eq!(value["issue"][0]["diagnostics"], "Error searching resources.");
        assert!(executor.statements().is_empty());
    }

    #[test]
    fn data_access_failure_is_reported_with_detail() {
        let response = service(StubExecutor::failing("login timeout"))
            .search(&search_request("procedure", &[("patient.identifier", NHS_NUMBER)]));
        assert_eq!(response.status, 500);
        let value = body(&response);
        assert_eq!(value["issue"][0]["code"], "transient");
        assert!(value["issue"][0]["details"]["text"]
            .as_str()
            .is_some_and(|text| text.contains("login timeout")));
    }

    #[test]
    fn one_bad_row_fails_the_whole_bundle() {
        let executor = StubExecutor::with_rows(vec![
            Row::new().with("PTdiagnosisID", "C1"),
            Row::new().with("MRN", "no id column"),
        ]);
        let response = service(executor)
            .search(&search_request("condition", &[("patient.identifier", NHS_NUMBER)]));
        assert_eq!(response.status, 500);
        let value = body(&response);
        assert_eq!(value["resourceType"], "OperationOutcome");
        assert_eq!(value["issue"][0]["code"], "transient");
    }

    #[test]
    fn read_returns_the_resource() {
        let executor = StubExecutor::with_rows(vec![Row::new().with("MRN", "100234")]);
        let response = service(executor.clone()).read(&ReadRequest {
            resource_type: "Patient".into(),
            id: "100234".into(),
        });
        assert_eq!(response.status, 200);
        assert!(response.is_success());
        let value = body(&response);
        assert_eq!(value["resourceType"], "Patient");
        assert_eq!(value["id"], "100234");
        assert!(executor.statements()[0].contains("@mrn='100234'"));
    }

    #[test]
    fn read_maps_only_the_first_row() {
        let executor = StubExecutor::with_rows(vec![
            Row::new().with("PT_alertID", "A1").with("MRN", "100234"),
            Row::new().with("PT_alertID", "A2").with("MRN", "100234"),
        ]);
        let response = service(executor.clone()).read(&ReadRequest {
            resource_type: "flag".into(),
            id: "A1".into(),
        });
        assert_eq!(response.status, 200);
        assert_eq!(body(&response)["id"], "A1");
        assert!(executor.statements()[0].contains("@id='A1'"));
    }

    #[test]
    fn encounter_starting_later_today_is_tagged_detail() {
        let executor = StubExecutor::with_rows(vec![
            Row::new()
                .with("Encounter_ID", "E1")
                .with("status", "booked")
                .with("Start_Date", "2024-06-30T23:59:00"),
            Row::new()
                .with("Encounter_ID", "E2")
                .with("status", "finished")
                .with("Start_Date", "2024-06-30T08:00:00"),
        ]);
        let response = service(executor).search(&search_request(
            "Encounter",
            &[("patient.identifier", NHS_NUMBER)],
        ));
        let value = body(&response);
        assert_eq!(value["entry"][0]["resource"]["meta"]["tag"][0]["code"], "detail");
        assert_eq!(value["entry"][1]["resource"]["meta"]["tag"][0]["code"], "summary");
    }

    #[test]
    fn read_without_rows_is_not_found() {
        let response = service(StubExecutor::with_rows(Vec::new())).read(&ReadRequest {
            resource_type: "flag".into(),
            id: "A9".into(),
        });
        assert_eq!(response.status, 404);
        assert_eq!(body(&response)["issue"][0]["code"], "not-found");
    }

    #[test]
    fn read_without_query_has_no_data_source() {
        let executor = StubExecutor::with_rows(Vec::new());
        let response = service(executor.clone()).read(&ReadRequest {
            resource_type: "appointment".into(),
            id: "B1".into(),
        });
        assert_eq!(response.status, 500);
        let value = body(&response);
        assert_eq!(value["issue"][0]["code"], "not-supported");
        assert_eq!(value["issue"][0]["diagnostics"], "Error reading resource.");
        assert!(executor.statements().is_empty());
    }

    #[test]
    fn rendered_response_is_json() {
        let response = service(StubExecutor::with_rows(Vec::new()))
            .search(&search_request("flag", &[("patient.identifier", NHS_NUMBER)]));
        let text = response.render().expect("render");
        let value: Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(value["resourceType"], "Bundle");
    }
}
