use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sider_core::constants::FIXTURE_FILE_KEY;
use sider_core::{CoreConfig, EnvConfig, FixtureQueryExecutor, SearchService};

/// Main entry point for the SIDeR listener
///
/// Loads `.env`, resolves the listener configuration from the environment and serves the REST
/// API with per-request tracing until Ctrl-C is received.
///
/// Rows are served from the JSON fixture file named by `SIDER_FIXTURE_FILE`; a database-backed
/// [`sider_core::QueryExecutor`] slots in at the same seam.
///
/// # Environment Variables
/// - `SIDER_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `SIDER_API_URL`: Public base URL used for subjects, full URLs and self links
/// - `SIDER_API_KEY`: Key passed to every named query
/// - `SIDER_FIXTURE_FILE`: JSON row fixtures
/// - `SIDER_PATIENT_ID_SYSTEM`, `SIDER_FLAG_SNOMED_CODES`, `SIDER_FLAG_LOCAL_CODES`,
///   `SIDER_RECENCY_WINDOW_DAYS`, `SIDER_SWITCHBOARD_*`: optional overrides
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sider_run=info".parse()?)
                .add_directive("sider_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("SIDER_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::from_source(&EnvConfig)?);
    let fixture_file = std::env::var(FIXTURE_FILE_KEY)
        .map_err(|_| anyhow::anyhow!("{FIXTURE_FILE_KEY} must name a fixture file"))?;
    let executor = FixtureQueryExecutor::from_path(&fixture_file)?;
    tracing::info!(
        procedures = executor.procedures().count(),
        fixture_file,
        "fixture rows loaded"
    );

    let service = SearchService::new(cfg, Arc::new(executor));
    let app = api_rest::router(service).layer(TraceLayer::new_for_http());

    tracing::info!("++ Starting SIDeR REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- SIDeR REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
