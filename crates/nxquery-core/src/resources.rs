// ── List proxy ──
//
// Resource calls used by selection UIs. Each resource maps to one GET
// endpoint; `{objects: [{name, id}]}` bodies come back sorted by name,
// anything else is passed through byte for byte.

use bytes::Bytes;
use nxquery_api::ObjectFilter;
use nxquery_api::endpoints::{dci_list_path, object_list_path, paths};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::router::Datasource;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// Named list resources.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum ListResource {
    AlarmObjects,
    DciObjects,
    SummaryTableObjects,
    ObjectQueryObjects,
    ObjectStatusObjects,
    SummaryTables,
    ObjectQueries,
    /// DCIs of one object; needs an `objectId` parameter.
    Dcis,
}

impl ListResource {
    /// Remote path for this resource.
    pub fn remote_path(self, object_id: Option<i64>) -> Result<String, ResourceResponse> {
        Ok(match self {
            // Both select a root object, so they share the alarm list.
            Self::AlarmObjects | Self::ObjectStatusObjects => object_list_path(ObjectFilter::Alarm),
            Self::DciObjects => object_list_path(ObjectFilter::Dci),
            Self::SummaryTableObjects => object_list_path(ObjectFilter::Summary),
            Self::ObjectQueryObjects => object_list_path(ObjectFilter::Query),
            Self::SummaryTables => paths::SUMMARY_TABLES.to_owned(),
            Self::ObjectQueries => paths::OBJECT_QUERIES.to_owned(),
            Self::Dcis => {
                let id = object_id
                    .ok_or_else(|| ResourceResponse::text(400, "missing objectId parameter"))?;
                dci_list_path(id)
            }
        })
    }
}

/// A resource call as made by the host: a path plus query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl ResourceRequest {
    /// Split `dcis?objectId=5` style input into path and parameters.
    pub fn parse(raw: &str) -> Self {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        Self {
            path: path.trim_matches('/').to_owned(),
            params: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Status, content type and body handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Bytes,
}

impl ResourceResponse {
    pub fn json(body: Bytes) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE_JSON,
            body,
        }
    }

    pub fn text(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_TEXT,
            body: Bytes::from(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn from_error(err: &CoreError) -> Self {
        let status = match err {
            CoreError::Unauthorized => 401,
            CoreError::Api { status, .. } => *status,
            CoreError::ConnectionFailed { .. } => 502,
            CoreError::Timeout { .. } => 504,
            _ => 500,
        };
        Self::text(status, err.to_string())
    }
}

impl Datasource {
    /// Serve one list resource.
    pub async fn call_resource(&self, request: &ResourceRequest) -> ResourceResponse {
        let Ok(resource) = request.path.parse::<ListResource>() else {
            return ResourceResponse::text(404, format!("unknown resource '{}'", request.path));
        };

        let object_id = match request.param("objectId").filter(|v| !v.is_empty()) {
            None => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => return ResourceResponse::text(400, "invalid objectId parameter"),
            },
        };
        let path = match resource.remote_path(object_id) {
            Ok(path) => path,
            Err(response) => return response,
        };

        debug!(%resource, %path, "list resource");
        match self.fetch_list(&path).await {
            Ok(body) => ResourceResponse::json(sort_objects(body)),
            Err(e) => {
                warn!(%resource, error = %e, "list resource failed");
                ResourceResponse::from_error(&e)
            }
        }
    }

    async fn fetch_list(&self, path: &str) -> Result<Bytes, CoreError> {
        let client = self.settings()?.client()?;
        Ok(client.get(path).await?)
    }
}

// ── Sorting ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ObjectList {
    objects: Vec<Value>,
}

#[derive(Serialize)]
struct SortedList<'a> {
    objects: &'a [Value],
}

/// Sort an `{objects: [{name, id}]}` body by name, ascending.
///
/// Stable, case-sensitive ordinal comparison. Any other shape, including
/// entries without a string `name`, is returned unchanged.
pub fn sort_objects(body: Bytes) -> Bytes {
    let Ok(list) = serde_json::from_slice::<ObjectList>(&body) else {
        return body;
    };
    let names: Option<Vec<&str>> = list
        .objects
        .iter()
        .map(|o| o.get("name").and_then(Value::as_str))
        .collect();
    let Some(names) = names else {
        return body;
    };

    let mut order: Vec<usize> = (0..list.objects.len()).collect();
    order.sort_by(|&a, &b| names[a].cmp(names[b]));
    let sorted: Vec<Value> = order.into_iter().map(|i| list.objects[i].clone()).collect();

    match serde_json::to_vec(&SortedList { objects: &sorted }) {
        Ok(out) => Bytes::from(out),
        Err(_) => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(body: &Bytes) -> Vec<String> {
        let value: Value = serde_json::from_slice(body).unwrap();
        value["objects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["name"].as_str().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn sorts_by_name_case_sensitively() {
        let body = Bytes::from(
            json!({"objects": [
                {"name": "switch", "id": 3},
                {"name": "Router", "id": 1},
                {"name": "access-point", "id": 2}
            ]})
            .to_string(),
        );
        assert_eq!(names(&sort_objects(body)), ["Router", "access-point", "switch"]);
    }

    #[test]
    fn sort_is_stable_for_equal_names() {
        let body = Bytes::from(
            json!({"objects": [
                {"name": "b", "id": 1},
                {"name": "a", "id": 2},
                {"name": "b", "id": 3}
            ]})
            .to_string(),
        );
        let sorted: Value = serde_json::from_slice(&sort_objects(body)).unwrap();
        let ids: Vec<_> = sorted["objects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[test]
    fn other_shapes_pass_through() {
        for raw in [
            r#"[{"name":"b"},{"name":"a"}]"#,
            r#"{"items":[]}"#,
            r#"{"objects":[{"id":1},{"name":"a"}]}"#,
            "not json",
        ] {
            let body = Bytes::from_static(raw.as_bytes());
            assert_eq!(sort_objects(body.clone()), body);
        }
    }

    #[test]
    fn request_parsing() {
        let req = ResourceRequest::parse("/dcis?objectId=42");
        assert_eq!(req.path, "dcis");
        assert_eq!(req.param("objectId"), Some("42"));
        assert!(ResourceRequest::parse("summaryTables").params.is_empty());
    }

    #[test]
    fn object_lists_share_filters() {
        assert_eq!(
            ListResource::ObjectStatusObjects.remote_path(None).unwrap(),
            "/v1/object-list?filter=alarm"
        );
        assert_eq!(
            ListResource::SummaryTableObjects.remote_path(None).unwrap(),
            "/v1/object-list?filter=summary"
        );
        assert_eq!(
            ListResource::Dcis.remote_path(Some(7)).unwrap(),
            "/v1/objects/7/dci-list"
        );
        assert_eq!(ListResource::Dcis.remote_path(None).unwrap_err().status, 400);
    }

    #[tokio::test]
    async fn unknown_and_incomplete_requests_are_rejected_locally() {
        let ds = Datasource::new(crate::settings::InstanceSettings::default());

        let unknown = ds.call_resource(&ResourceRequest::parse("devices")).await;
        assert_eq!(unknown.status, 404);

        let missing = ds.call_resource(&ResourceRequest::parse("dcis")).await;
        assert_eq!(missing.status, 400);
        assert_eq!(missing.body, Bytes::from_static(b"missing objectId parameter"));

        let invalid = ds.call_resource(&ResourceRequest::parse("dcis?objectId=x")).await;
        assert_eq!(invalid.body, Bytes::from_static(b"invalid objectId parameter"));

        let no_server = ds.call_resource(&ResourceRequest::parse("summaryTables")).await;
        assert_eq!(no_server.status, 500);
    }
}
