//! # API REST
//!
//! REST host for the SIDeR listener.
//!
//! Handles:
//! - HTTP endpoints with axum (`/health`, `/{type}` search, `/{type}/{id}` read)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (content type, CORS, moving blocking work off the runtime)
//!
//! All request semantics live in `sider-core`; handlers only translate between HTTP and
//! [`SearchService`].

#![warn(rust_2018_idioms)]

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use fhir::{IssueSeverity, IssueType, OperationOutcome};
use serde::Serialize;
use sider_core::{FhirResponse, ReadRequest, SearchRequest, SearchService, FHIR_JSON};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    service: Arc<SearchService>,
}

/// Health check response body.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(paths(health, search, read), components(schemas(HealthRes)))]
struct ApiDoc;

/// Build the REST router around `service`.
pub fn router(service: SearchService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route("/health", get(health))
        .route("/:resource_type", get(search))
        .route("/:resource_type/:id", get(read))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve `service` until the server stops.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, service: SearchService) -> anyhow::Result<()> {
    tracing::info!("-- Starting SIDeR REST API on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(service)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "SIDeR REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/{resource_type}",
    params(
        ("resource_type" = String, Path, description = "Resource type, any case (e.g. Condition)")
    ),
    responses(
        (status = 200, description = "Searchset bundle"),
        (status = 500, description = "OperationOutcome describing the failure")
    )
)]
/// Search resources of one type
///
/// Query string parameters become search parameters, e.g.
/// `GET /condition?patient.identifier=https://fhir.nhs.uk/Id/nhs-number|9999999999`.
async fn search(
    State(state): State<AppState>,
    Path(resource_type): Path<String>,
    Query(parameters): Query<Vec<(String, String)>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let request_url = match uri.query() {
        Some(query) => format!("{}{}?{}", state.service.config().api_url(), uri.path(), query),
        None => format!("{}{}", state.service.config().api_url(), uri.path()),
    };
    let request = SearchRequest {
        context_path: format!("/{resource_type}"),
        resource_type,
        parameters,
        request_url,
    };

    let service = state.service.clone();
    let outcome = tokio::task::spawn_blocking(move || service.search(&request)).await;
    respond(outcome)
}

#[utoipa::path(
    get,
    path = "/{resource_type}/{id}",
    params(
        ("resource_type" = String, Path, description = "Resource type, any case (e.g. Patient)"),
        ("id" = String, Path, description = "Resource id")
    ),
    responses(
        (status = 200, description = "The resource"),
        (status = 404, description = "OperationOutcome: no such resource"),
        (status = 500, description = "OperationOutcome describing the failure")
    )
)]
/// Read one resource by id
async fn read(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
) -> Response {
    let request = ReadRequest { resource_type, id };
    let service = state.service.clone();
    let outcome = tokio::task::spawn_blocking(move || service.read(&request)).await;
    respond(outcome)
}

/// Served when the outcome document itself cannot be rendered.
const INTERNAL_ERROR_OUTCOME: &str = r#"{"resourceType":"OperationOutcome","issue":[{"severity":"error","code":"exception","diagnostics":"Internal error"}]}"#;

fn respond(outcome: Result<FhirResponse, tokio::task::JoinError>) -> Response {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Request worker failed: {:?}", e);
            return internal_error();
        }
    };

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response.render() {
        Ok(body) => fhir_json(status, body),
        Err(e) => {
            tracing::error!("Failed to render response: {:?}", e);
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    let body = OperationOutcome::single(IssueSeverity::Error, IssueType::Exception, "Internal error")
        .render()
        .unwrap_or_else(|_| INTERNAL_ERROR_OUTCOME.to_owned());
    fhir_json(StatusCode::INTERNAL_SERVER_ERROR, body)
}

fn fhir_json(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, FHIR_JSON)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::NaiveDate;
    use serde_json::Value;
    use sider_core::{CoreConfig, FixtureQueryExecutor, Row};
    use tower::ServiceExt;

    const BASE: &str = "https://sider.example.nhs.uk/fhir";

    fn app() -> Router {
        let mut executor = FixtureQueryExecutor::default();
        executor.insert(
            "sp_FHIR_IMS_Conditions",
            "9999999999",
            vec![Row::new().with("PTdiagnosisID", "C1").with("MRN", "100234")],
        );
        executor.insert(
            "sp_FHIR_IMS_Patient_MRN",
            "100234",
            vec![Row::new().with("MRN", "100234")],
        );
        let cfg = Arc::new(CoreConfig::new(BASE, "test-key").expect("config"));
        let service = SearchService::new(cfg, Arc::new(executor))
            .with_now(
                NaiveDate::from_ymd_opt(2024, 6, 30)
                    .and_then(|d| d.and_hms_opt(12, 0, 0))
                    .expect("timestamp"),
            );
        router(service)
    }

    async fn get(uri: &str) -> (StatusCode, Option<String>, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, content_type, value)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, _, value) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn search_returns_bundle() {
        let (status, content_type, value) = get(
            "/Condition?patient.identifier=https://fhir.nhs.uk/Id/nhs-number%7C9999999999",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some(FHIR_JSON));
        assert_eq!(value["resourceType"], "Bundle");
        assert_eq!(value["total"], 1);
        assert_eq!(value["entry"][0]["fullUrl"], format!("{BASE}/Condition/C1"));
        assert!(value["link"][0]["url"]
            .as_str()
            .is_some_and(|url| url.starts_with(&format!("{BASE}/Condition?"))));
    }

    #[tokio::test]
    async fn unsupported_parameter_is_an_outcome() {
        let (status, content_type, value) = get("/patient?foo=bar").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type.as_deref(), Some(FHIR_JSON));
        assert_eq!(value["resourceType"], "OperationOutcome");
        assert_eq!(value["issue"][0]["code"], "invalid");
    }

    #[tokio::test]
    async fn failed_worker_still_returns_an_outcome() {
        let outcome =
            tokio::task::spawn_blocking(|| -> FhirResponse { panic!("worker panicked") }).await;
        let response = respond(outcome);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(value["resourceType"], "OperationOutcome");
        assert_eq!(value["issue"][0]["code"], "exception");
    }

    #[test]
    fn fallback_outcome_is_well_formed() {
        let value: Value = serde_json::from_str(INTERNAL_ERROR_OUTCOME).expect("json");
        assert_eq!(value["resourceType"], "OperationOutcome");
        assert_eq!(value["issue"][0]["severity"], "error");
    }

    #[tokio::test]
    async fn read_returns_resource_or_not_found() {
        let (status, _, value) = get("/patient/100234").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["resourceType"], "Patient");

        let (status, _, value) = get("/patient/404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["issue"][0]["code"], "not-found");
    }
}
