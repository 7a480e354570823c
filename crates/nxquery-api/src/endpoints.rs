// NetXMS WebAPI endpoints
//
// Paths and thin request helpers. Responses are returned as raw bytes so
// the shaping layer decides how to decode them.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Method;
use tracing::debug;

use crate::client::{NetXmsClient, RawResponse};
use crate::error::Error;
use crate::models::RootObjectRequest;

/// Relative paths of the endpoints used by this crate.
pub mod paths {
    pub const ALARMS: &str = "/v1/grafana/infinity/alarms";
    pub const OBJECT_STATUS: &str = "/v1/grafana/infinity/object-status";
    pub const SUMMARY_TABLE: &str = "/v1/grafana/infinity/summary-table";
    pub const OBJECT_QUERY: &str = "/v1/grafana/infinity/object-query";
    pub const OBJECT_LIST: &str = "/v1/object-list";
    pub const SUMMARY_TABLES: &str = "/v1/summary-tables";
    pub const OBJECT_QUERIES: &str = "/v1/object-queries";
    pub const SERVER_INFO: &str = "/v1/server-info";
}

/// Time format understood by the history endpoint (`Mon Jan  2 15:04:05 UTC 2006`).
pub const HISTORY_TIME_FORMAT: &str = "%a %b %e %H:%M:%S UTC %Y";

/// Purpose filter for `GET /v1/object-list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFilter {
    Alarm,
    Dci,
    Summary,
    Query,
}

impl ObjectFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alarm => "alarm",
            Self::Dci => "dci",
            Self::Summary => "summary",
            Self::Query => "query",
        }
    }
}

/// Path of the object list for a given purpose.
pub fn object_list_path(filter: ObjectFilter) -> String {
    format!("{}?filter={}", paths::OBJECT_LIST, filter.as_str())
}

/// Path of the DCI list of one object.
pub fn dci_list_path(object_id: i64) -> String {
    format!("/v1/objects/{object_id}/dci-list")
}

/// Path of a DCI's value history over `[from, to]`.
pub fn dci_history_path(
    object_id: i64,
    dci_id: i64,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("timeFrom", &from.format(HISTORY_TIME_FORMAT).to_string())
        .append_pair("timeTo", &to.format(HISTORY_TIME_FORMAT).to_string())
        .finish();
    format!("/v1/objects/{object_id}/data-collection/{dci_id}/history?{query}")
}

impl NetXmsClient {
    /// Alarms below an optional root object.
    ///
    /// `POST /v1/grafana/infinity/alarms`
    pub async fn alarms(&self, root_object_id: Option<i64>) -> Result<Bytes, Error> {
        debug!(?root_object_id, "fetching alarms");
        self.post_json(paths::ALARMS, &RootObjectRequest { root_object_id })
            .await
    }

    /// Status of the objects below an optional root object.
    ///
    /// `POST /v1/grafana/infinity/object-status`
    pub async fn object_status(&self, root_object_id: Option<i64>) -> Result<Bytes, Error> {
        debug!(?root_object_id, "fetching object status");
        self.post_json(paths::OBJECT_STATUS, &RootObjectRequest { root_object_id })
            .await
    }

    /// Historical values of one DCI.
    ///
    /// `GET /v1/objects/{object}/data-collection/{dci}/history`
    pub async fn dci_history(
        &self,
        object_id: i64,
        dci_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Bytes, Error> {
        self.get(&dci_history_path(object_id, dci_id, from, to))
            .await
    }

    /// Server information, returned unclassified so the caller can report
    /// the exact status code.
    ///
    /// `GET /v1/server-info`
    pub async fn server_info(&self) -> Result<RawResponse, Error> {
        self.execute(Method::GET, paths::SERVER_INFO, None).await
    }
}
