//! Query routing and response shaping between a visualization frontend and
//! the NetXMS WebAPI.
//!
//! - **[`Datasource`]**: Entry point. [`query_data()`](Datasource::query_data)
//!   runs a batch of typed queries and returns one [`DataResponse`] per refId;
//!   [`call_resource()`](Datasource::call_resource) serves sorted selector
//!   lists; [`check_health()`](Datasource::check_health) validates settings,
//!   reachability and the server version.
//!
//! - **Shapers** ([`shape`]): Convert remote JSON into [`Frame`]s. Covers the
//!   order-preserving dynamic table shaper, the alarm and object-status
//!   shapers with their fixed color tables, and the DCI history shaper.
//!
//! - **Settings** ([`settings`]): The `LoadSettings` contract. Loaded fresh
//!   for every call; nothing is cached between requests.
//!
//! - **Domain model** ([`model`]): Queries in, frames and per-query results
//!   out.

pub mod error;
pub mod handlers;
pub mod health;
pub mod model;
pub mod resources;
pub mod router;
pub mod settings;
pub mod shape;
pub mod version;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use health::{HealthCheckResult, HealthStatus, MIN_SERVER_VERSION};
pub use resources::{ListResource, ResourceRequest, ResourceResponse};
pub use router::Datasource;
pub use settings::{InstanceSettings, Settings};
pub use version::{compare_versions, is_version_greater_or_equal};

pub use model::{
    DataQuery, DataResponse, Field, FieldColor, FieldConfig, FieldType, FieldValues, Frame,
    QueryDataRequest, QueryDataResponse, QueryError, QueryModel, QueryType, ResponseStatus,
    TimeRange, ValueMapping,
};

// Re-exported so hosts don't need a direct tokio-util dependency.
pub use tokio_util::sync::CancellationToken;
