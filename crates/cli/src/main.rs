use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sider_core::constants::FIXTURE_FILE_KEY;
use sider_core::query::{named_query, supported_parameters};
use sider_core::{
    CoreConfig, EnvConfig, FhirResponse, FixtureQueryExecutor, QueryMode, ReadRequest,
    ResourceKind, SearchRequest, SearchService,
};

#[derive(Parser)]
#[command(name = "sider")]
#[command(about = "SIDeR shared care record listener CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List resource types with their search parameters and named queries
    Kinds,
    /// Search resources of one type and print the bundle
    Search {
        /// Resource type (any case, e.g. Condition)
        resource_type: String,
        /// Search parameter as name=value (repeatable)
        #[arg(long = "param", short = 'p', value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// JSON row fixtures (defaults to SIDER_FIXTURE_FILE)
        #[arg(long)]
        fixtures: Option<String>,
    },
    /// Read one resource by id and print it
    Read {
        /// Resource type (any case, e.g. Patient)
        resource_type: String,
        /// Resource id
        id: String,
        /// JSON row fixtures (defaults to SIDER_FIXTURE_FILE)
        #[arg(long)]
        fixtures: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sider_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Kinds) => {
            for kind in ResourceKind::ALL {
                println!(
                    "{:<12} params: {:<20} search: {:<26} read: {}",
                    kind.resource_type(),
                    supported_parameters(kind).join(", "),
                    named_query(kind, QueryMode::Search).unwrap_or("-"),
                    named_query(kind, QueryMode::Read).unwrap_or("-"),
                );
            }
        }
        Some(Commands::Search {
            resource_type,
            params,
            fixtures,
        }) => {
            let service = service(fixtures)?;
            let context_path = format!("/{resource_type}");
            let request_url = request_url(service.config().api_url(), &context_path, &params);
            let response = service.search(&SearchRequest {
                resource_type,
                parameters: params,
                context_path,
                request_url,
            });
            print_response(&response)?;
        }
        Some(Commands::Read {
            resource_type,
            id,
            fixtures,
        }) => {
            let service = service(fixtures)?;
            let response = service.read(&ReadRequest { resource_type, id });
            print_response(&response)?;
        }
        None => {
            println!("Use 'sider --help' for commands");
        }
    }

    Ok(())
}

fn service(fixtures: Option<String>) -> anyhow::Result<SearchService> {
    let cfg = Arc::new(CoreConfig::from_source(&EnvConfig)?);
    let path = match fixtures {
        Some(path) => path,
        None => std::env::var(FIXTURE_FILE_KEY)
            .map_err(|_| anyhow::anyhow!("pass --fixtures or set {FIXTURE_FILE_KEY}"))?,
    };
    let executor = FixtureQueryExecutor::from_path(&path)?;
    Ok(SearchService::new(cfg, Arc::new(executor)))
}

fn print_response(response: &FhirResponse) -> anyhow::Result<()> {
    eprintln!("status: {}", response.status);
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    if !response.is_success() {
        anyhow::bail!("request failed with status {}", response.status);
    }
    Ok(())
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}

/// Echo the parameters back the way an HTTP caller would have sent them.
fn request_url(base: &str, context_path: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return format!("{base}{context_path}");
    }
    let query = params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}{context_path}?{query}")
}
