//! # SIDeR Core
//!
//! Core business logic for the SIDeR shared care record listener.
//!
//! This crate turns flat rows returned by named queries into CareConnect resources and
//! assembles them into search bundles:
//! - typed row schemas per resource kind ([`schema`])
//! - the delimited multi-value decoder ([`coding`]) and sentinel date handling ([`dates`])
//! - the visibility tag engine ([`visibility`])
//! - one mapper per resource kind ([`mappers`])
//! - query building and the executor seam ([`query`])
//! - search and read orchestration ([`search`])
//!
//! **No transport concerns**: HTTP servers and CLIs belong in `api-rest` and `sider-cli`.

pub mod coding;
pub mod config;
pub mod constants;
pub mod dates;
pub mod error;
pub mod fixtures;
pub mod mappers;
pub mod query;
pub mod resource_kind;
pub mod row;
pub mod schema;
pub mod search;
pub mod visibility;

pub use config::{CodeAllowList, ConfigSource, CoreConfig, EnvConfig, SwitchboardContact};
pub use error::{CoreError, CoreResult, SearchError, SearchResult};
pub use fixtures::FixtureQueryExecutor;
pub use query::{QueryBuilder, QueryError, QueryExecutor, QueryMode, ResourceQuery, RowCursor};
pub use resource_kind::ResourceKind;
pub use row::Row;
pub use search::{FhirResponse, ReadRequest, ResponseBody, SearchRequest, SearchService, FHIR_JSON};
