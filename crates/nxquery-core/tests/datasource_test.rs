#![allow(clippy::unwrap_used)]
// End-to-end tests for `Datasource` against a wiremock NetXMS server.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nxquery_core::settings::API_KEY_FIELD;
use nxquery_core::{
    CancellationToken, DataQuery, Datasource, FieldColor, FieldValues, HealthStatus,
    InstanceSettings, QueryDataRequest, ResourceRequest, ResponseStatus, TimeRange,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn datasource(server: &MockServer) -> Datasource {
    Datasource::new(InstanceSettings {
        json_data: json!({ "serverAddress": server.uri() }),
        decrypted_secure_json_data: HashMap::from([(API_KEY_FIELD.into(), "test-key".into())]),
    })
}

fn query(ref_id: &str, query_type: &str, model: &str) -> DataQuery {
    DataQuery {
        ref_id: ref_id.into(),
        query_type: query_type.into(),
        time_range: TimeRange::default(),
        json: Bytes::from(model.to_owned()),
    }
}

fn batch(queries: Vec<DataQuery>) -> QueryDataRequest {
    QueryDataRequest { queries }
}

// ── Batch isolation ─────────────────────────────────────────────────

#[tokio::test]
async fn test_malformed_query_fails_alone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/grafana/infinity/summary-table"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Node": "core-sw", "CPU": 12.5, "Up": true },
            { "Node": "edge-rtr", "CPU": 40, "Up": false }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let model = r#"{"summaryTableId": "3", "sourceObjectId": "100"}"#;
    let request = batch(vec![
        query("A", "summaryTables", model),
        query("B", "summaryTables", "{\"summaryTableId\": "),
        query("C", "summaryTables", model),
    ]);

    let response = datasource(&server)
        .query_data(request, &CancellationToken::new())
        .await;

    assert_eq!(response.len(), 3);
    let ids: Vec<_> = response.responses.keys().cloned().collect();
    assert_eq!(ids, ["A", "B", "C"]);

    for ok in ["A", "C"] {
        let result = response.get(ok).unwrap();
        assert!(result.is_ok(), "{ok}: {:?}", result.error);
        let frame = &result.frames[0];
        assert_eq!(frame.name, "summaryTable");
        assert_eq!(frame.field_names(), vec!["Node", "CPU", "Up"]);
    }

    let b = response.get("B").unwrap();
    assert_eq!(b.status, ResponseStatus::BadRequest);
    assert!(b.frames.is_empty());
    assert!(
        b.error.as_ref().unwrap().message.starts_with("json unmarshal:"),
        "{:?}",
        b.error
    );
}

#[tokio::test]
async fn test_unauthorized_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/grafana/infinity/alarms"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "reason": "session expired" })),
        )
        .mount(&server)
        .await;

    let response = datasource(&server)
        .query_data(batch(vec![query("A", "alarms", "{}")]), &CancellationToken::new())
        .await;

    let a = response.get("A").unwrap();
    assert_eq!(a.status, ResponseStatus::Unauthorized);
    assert_eq!(a.error.as_ref().unwrap().message, "Unauthorized: Invalid API key");
}

#[tokio::test]
async fn test_remote_reason_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/grafana/infinity/object-query"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "reason": "Query not found" })),
        )
        .mount(&server)
        .await;

    let response = datasource(&server)
        .query_data(
            batch(vec![query("A", "objectQueries", r#"{"objectQueryId": 77}"#)]),
            &CancellationToken::new(),
        )
        .await;

    let a = response.get("A").unwrap();
    assert_eq!(a.status, ResponseStatus::NotFound);
    assert_eq!(a.error.as_ref().unwrap().message, "Query not found");
}

// ── Query types ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_alarms_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/grafana/infinity/alarms"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_json(json!({ "rootObjectId": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "Id": 7,
            "Severity": "Critical",
            "State": "Resolved",
            "Source": "core-sw",
            "Message": "Node down",
            "Count": 2,
            "Ack/Resolve by": "admin",
            "Created": "2024-06-15T10:30:00Z",
            "Last Change": "2024-06-15T10:45:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let response = datasource(&server)
        .query_data(
            batch(vec![query("A", "alarms", r#"{"sourceObjectId": "2"}"#)]),
            &CancellationToken::new(),
        )
        .await;

    let frame = &response.get("A").unwrap().frames[0];
    assert_eq!(frame.name, "alarms");
    assert_eq!(frame.row_count(), 1);
    let severity = frame.field("Severity").unwrap();
    assert_eq!(
        severity.config.mapping_for("Critical").unwrap().color,
        "rgb(160, 0, 0)"
    );
    let state = frame.field("State").unwrap();
    assert_eq!(state.config.mapping_for("Resolved").unwrap().color, "green");
}

#[tokio::test]
async fn test_object_status_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/grafana/infinity/object-status"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "core-sw", "status": 3 },
            { "name": "edge-rtr", "status": 12 }
        ])))
        .mount(&server)
        .await;

    let response = datasource(&server)
        .query_data(
            batch(vec![query("A", "objectStatus", "{}")]),
            &CancellationToken::new(),
        )
        .await;

    let a = response.get("A").unwrap();
    assert_eq!(a.status, ResponseStatus::BadRequest);
    assert_eq!(
        a.error.as_ref().unwrap().message,
        "object 'edge-rtr' has unknown status code 12"
    );

    Mock::given(method("POST"))
        .and(path("/v1/grafana/infinity/object-status"))
        .and(body_json(json!({ "rootObjectId": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "core-sw", "status": 3 }
        ])))
        .mount(&server)
        .await;

    let response = datasource(&server)
        .query_data(
            batch(vec![query("A", "objectStatus", r#"{"sourceObjectId": 5}"#)]),
            &CancellationToken::new(),
        )
        .await;
    let frames = &response.get("A").unwrap().frames;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].name, "core-sw");
    assert_eq!(
        frames[0].fields()[0].config.color,
        Some(FieldColor::fixed("rgb(255, 128, 0)"))
    );
}

#[tokio::test]
async fn test_dci_values_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/objects/100/data-collection/7/history"))
        .and(query_param("timeFrom", "Sat Jun 15 10:00:00 UTC 2024"))
        .and(query_param("timeTo", "Sat Jun 15 11:00:00 UTC 2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": "CPU usage",
            "unitName": "%",
            "values": [
                { "timestamp": "2024-06-15T10:00:00Z", "value": "12.5" },
                { "timestamp": "2024-06-15T10:05:00Z", "value": "17" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut q = query("A", "dciValues", r#"{"sourceObjectId": "100", "dciId": "7"}"#);
    q.time_range = TimeRange {
        from: Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
        to: Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap(),
    };

    let response = datasource(&server)
        .query_data(batch(vec![q]), &CancellationToken::new())
        .await;

    let frame = &response.get("A").unwrap().frames[0];
    assert_eq!(frame.name, "CPU usage");
    let value = frame.field("value").unwrap();
    assert_eq!(value.config.unit.as_deref(), Some("%"));
    assert_eq!(value.values, FieldValues::Number(vec![Some(12.5), Some(17.0)]));
}

#[tokio::test]
async fn test_dci_values_requires_ids() {
    let server = MockServer::start().await;
    let response = datasource(&server)
        .query_data(
            batch(vec![query("A", "dciValues", r#"{"sourceObjectId": "100"}"#)]),
            &CancellationToken::new(),
        )
        .await;

    let a = response.get("A").unwrap();
    assert_eq!(a.status, ResponseStatus::BadRequest);
    assert_eq!(a.error.as_ref().unwrap().message, "missing dciId");
}

#[tokio::test]
async fn test_object_query_forwards_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/grafana/infinity/object-query"))
        .and(body_json(json!({
            "queryId": 4,
            "rootObjectId": 2,
            "queryParameters": [{ "key": "minUptime", "value": 3600, "type": "int" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "core-sw", "uptime": 86400 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let model = json!({
        "objectQueryId": "4",
        "sourceObjectId": "2",
        "queryParameters": r#"[{"key":"minUptime","value":3600,"type":"int"}]"#
    });
    let response = datasource(&server)
        .query_data(
            batch(vec![query("A", "objectQueries", &model.to_string())]),
            &CancellationToken::new(),
        )
        .await;

    let frame = &response.get("A").unwrap().frames[0];
    assert_eq!(frame.name, "objectQuery");
    assert_eq!(frame.rows(), vec![vec![json!("core-sw"), json!(86400.0)]]);
}

#[tokio::test]
async fn test_empty_table_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/grafana/infinity/summary-table"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let response = datasource(&server)
        .query_data(
            batch(vec![query(
                "A",
                "summaryTables",
                r#"{"summaryTableId": 1, "sourceObjectId": 2}"#,
            )]),
            &CancellationToken::new(),
        )
        .await;

    let a = response.get("A").unwrap();
    assert_eq!(a.status, ResponseStatus::BadRequest);
    assert_eq!(a.error.as_ref().unwrap().message, "empty array");
}

// ── Cancellation ────────────────────────────────────────────────────

#[tokio::test]
async fn test_cancel_aborts_in_flight_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/grafana/infinity/alarms"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let response = datasource(&server)
        .query_data(
            batch(vec![query("A", "alarms", "{}"), query("B", "alarms", "{}")]),
            &cancel,
        )
        .await;

    assert_eq!(response.len(), 2);
    for id in ["A", "B"] {
        assert_eq!(response.get(id).unwrap().status, ResponseStatus::Cancelled);
    }
}

// ── Health check ────────────────────────────────────────────────────

async fn health_with(status: u16, body: Value) -> (HealthStatus, String) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/server-info"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    let result = datasource(&server).check_health().await;
    (result.status, result.message)
}

#[tokio::test]
async fn test_health_ok() {
    let (status, message) = health_with(200, json!({ "version": "5.2.10" })).await;
    assert_eq!(status, HealthStatus::Ok);
    assert_eq!(message, "Data source is working");
}

#[tokio::test]
async fn test_health_old_version() {
    let (status, message) = health_with(200, json!({ "version": "5.1.9" })).await;
    assert_eq!(status, HealthStatus::Error);
    assert_eq!(
        message,
        "NetXMS server version 5.1.9 is not supported (minimum 5.2.4)"
    );
}

#[tokio::test]
async fn test_health_missing_version() {
    let (status, message) = health_with(200, json!({ "build": "abc" })).await;
    assert_eq!(status, HealthStatus::Error);
    assert_eq!(message, "Server response does not contain version information");
}

#[tokio::test]
async fn test_health_bad_status() {
    let (status, message) = health_with(403, json!({ "reason": "no access" })).await;
    assert_eq!(status, HealthStatus::Error);
    assert_eq!(message, "Server returned status code: 403 (forbidden)");
}

#[tokio::test]
async fn test_health_unreachable() {
    let ds = Datasource::new(InstanceSettings {
        json_data: json!({ "serverAddress": "http://127.0.0.1:1" }),
        decrypted_secure_json_data: HashMap::from([(API_KEY_FIELD.into(), "k".into())]),
    });
    let result = ds.check_health().await;
    assert_eq!(result.status, HealthStatus::Error);
    assert!(
        result.message.starts_with("Failed to connect to server:"),
        "{}",
        result.message
    );
}

// ── List proxy ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sorts_objects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/object-list"))
        .and(query_param("filter", "alarm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                { "name": "zeta", "id": 3 },
                { "name": "Alpha", "id": 1 },
                { "name": "beta", "id": 2 }
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let ds = datasource(&server);
    for resource in ["alarmObjects", "objectStatusObjects"] {
        let response = ds.call_resource(&ResourceRequest::parse(resource)).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "application/json");
        let body: Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(
            body,
            json!({ "objects": [
                { "name": "Alpha", "id": 1 },
                { "name": "beta", "id": 2 },
                { "name": "zeta", "id": 3 }
            ]})
        );
    }
}

#[tokio::test]
async fn test_list_passes_other_shapes_through() {
    let server = MockServer::start().await;
    let raw = r#"[{"id":1,"name":"b"},{"id":2,"name":"a"}]"#;
    Mock::given(method("GET"))
        .and(path("/v1/objects/42/dci-list"))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw))
        .mount(&server)
        .await;

    let response = datasource(&server)
        .call_resource(&ResourceRequest::parse("dcis?objectId=42"))
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(&response.body[..], raw.as_bytes());
}

#[tokio::test]
async fn test_list_forwards_remote_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/summary-tables"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "reason": "Access denied" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/object-queries"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let ds = datasource(&server);
    let forbidden = ds.call_resource(&ResourceRequest::parse("summaryTables")).await;
    assert_eq!(forbidden.status, 403);
    assert_eq!(&forbidden.body[..], b"Access denied");

    let unauthorized = ds.call_resource(&ResourceRequest::parse("objectQueries")).await;
    assert_eq!(unauthorized.status, 401);
    assert_eq!(&unauthorized.body[..], b"Unauthorized: Invalid API key");
}
