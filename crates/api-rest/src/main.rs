//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, serving rows from the fixture file named by
//! `SIDER_FIXTURE_FILE`.
//!
//! ## Intended use
//! This binary is useful for development and debugging against canned rows. The workspace's main
//! `sider-run` binary is the deployment entry point.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sider_core::constants::FIXTURE_FILE_KEY;
use sider_core::{CoreConfig, EnvConfig, FixtureQueryExecutor, SearchService};

/// Main entry point for the SIDeR REST API server
///
/// # Environment Variables
/// Variables may also come from a `.env` file in the working directory.
/// - `SIDER_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `SIDER_FIXTURE_FILE`: JSON row fixtures served in place of the database
/// - see `sider_core::config` for the remaining listener settings
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration or fixture file is invalid, or
/// - the server cannot bind or fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("SIDER_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::from_source(&EnvConfig)?);
    let fixture_file = std::env::var(FIXTURE_FILE_KEY)
        .map_err(|_| anyhow::anyhow!("{FIXTURE_FILE_KEY} must name a fixture file"))?;
    let executor = FixtureQueryExecutor::from_path(&fixture_file)?;
    tracing::info!(?cfg, fixture_file, "configuration resolved");

    api_rest::serve(&addr, SearchService::new(cfg, Arc::new(executor))).await
}
