// Request bodies and response shapes for the NetXMS Grafana endpoints.
//
// Only fixed-shape payloads are typed here. Summary tables and object
// queries return data-dependent columns and are handled as raw bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Request bodies ──────────────────────────────────────────────────

/// Body for the alarm and object-status endpoints.
///
/// Serializes to `{}` when no root object is selected.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootObjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_object_id: Option<i64>,
}

/// Body for `POST /v1/grafana/infinity/summary-table`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTableRequest {
    pub table_id: i64,
    pub base_object_id: i64,
}

/// Body for `POST /v1/grafana/infinity/object-query`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectQueryRequest {
    pub query_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_object_id: Option<i64>,
    /// User-supplied inputs, forwarded exactly as given.
    pub query_parameters: Vec<serde_json::Value>,
}

// ── Response shapes ─────────────────────────────────────────────────

/// One row of `POST /v1/grafana/infinity/alarms`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlarmRecord {
    #[serde(rename = "Id")]
    pub id: i32,
    #[serde(rename = "Severity")]
    pub severity: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Count", default)]
    pub count: i32,
    #[serde(rename = "Ack/Resolve by", default)]
    pub ack_by: Option<String>,
    #[serde(rename = "Created")]
    pub created: DateTime<Utc>,
    #[serde(rename = "Last Change")]
    pub last_change: DateTime<Utc>,
}

/// One row of `POST /v1/grafana/infinity/object-status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStatusRecord {
    pub name: String,
    pub status: i64,
}

/// Response of the DCI history endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DciHistory {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit_name: String,
    #[serde(default)]
    pub values: Vec<DciSample>,
}

/// A single historical sample; both fields arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct DciSample {
    pub timestamp: String,
    pub value: String,
}

/// Response of `GET /v1/server-info`. Other fields vary by server build.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub version: Option<String>,
}
