// ── Query handlers ──
//
// One async function per query type: validate the model, call the remote
// endpoint, shape the body. Summary tables and object queries share the
// dynamic table shaper and differ only in their `TableQuery` config.

use nxquery_api::NetXmsClient;
use nxquery_api::endpoints::paths;
use nxquery_api::models::{ObjectQueryRequest, SummaryTableRequest};
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{Frame, QueryField, QueryModel, TimeRange};
use crate::shape;

/// Per-query-type configuration of a dynamic table query.
#[derive(Debug, Clone, Copy)]
pub struct TableQuery {
    /// Endpoint the body is posted to.
    pub path: &'static str,
    /// Name of the resulting frame.
    pub frame_name: &'static str,
    /// Fields that must be present, with the error reported when absent.
    pub required: &'static [(QueryField, &'static str)],
    /// Builds the outgoing JSON body from the query model.
    pub build_body: fn(&QueryModel) -> Result<Value, CoreError>,
}

pub const SUMMARY_TABLE: TableQuery = TableQuery {
    path: paths::SUMMARY_TABLE,
    frame_name: "summaryTable",
    required: &[
        (QueryField::SummaryTableId, "missing summaryTableId"),
        (QueryField::SourceObjectId, "missing sourceObjectId"),
    ],
    build_body: summary_table_body,
};

pub const OBJECT_QUERY: TableQuery = TableQuery {
    path: paths::OBJECT_QUERY,
    frame_name: "objectQuery",
    required: &[(QueryField::ObjectQueryId, "missing objectQueryId")],
    build_body: object_query_body,
};

fn to_body<T: Serialize>(body: &T) -> Result<Value, CoreError> {
    serde_json::to_value(body).map_err(|e| CoreError::RequestBuild {
        message: e.to_string(),
    })
}

fn summary_table_body(model: &QueryModel) -> Result<Value, CoreError> {
    to_body(&SummaryTableRequest {
        table_id: model.require_id(QueryField::SummaryTableId)?,
        base_object_id: model.require_id(QueryField::SourceObjectId)?,
    })
}

fn object_query_body(model: &QueryModel) -> Result<Value, CoreError> {
    to_body(&ObjectQueryRequest {
        query_id: model.require_id(QueryField::ObjectQueryId)?,
        root_object_id: model.optional_id(QueryField::SourceObjectId)?,
        query_parameters: model.query_parameters()?,
    })
}

// ── Handlers ─────────────────────────────────────────────────────────

pub async fn alarms(client: &NetXmsClient, model: &QueryModel) -> Result<Vec<Frame>, CoreError> {
    let root = model.optional_id(QueryField::SourceObjectId)?;
    let body = client.alarms(root).await?;
    Ok(vec![shape::shape_alarms(&body)?])
}

pub async fn object_status(
    client: &NetXmsClient,
    model: &QueryModel,
) -> Result<Vec<Frame>, CoreError> {
    let root = model.optional_id(QueryField::SourceObjectId)?;
    let body = client.object_status(root).await?;
    shape::shape_object_status(&body)
}

pub async fn dci_values(
    client: &NetXmsClient,
    model: &QueryModel,
    range: &TimeRange,
) -> Result<Vec<Frame>, CoreError> {
    let object_id = model.require_id(QueryField::SourceObjectId)?;
    let dci_id = model.require_id(QueryField::DciId)?;
    let body = client
        .dci_history(object_id, dci_id, range.from, range.to)
        .await?;
    Ok(vec![shape::shape_dci_history(&body)?])
}

pub async fn table(
    client: &NetXmsClient,
    model: &QueryModel,
    query: &TableQuery,
) -> Result<Vec<Frame>, CoreError> {
    model.validate_required(query.required)?;
    let request = (query.build_body)(model)?;
    let body = client.post_json(query.path, &request).await?;
    Ok(vec![shape::shape_table(query.frame_name, &body)?])
}
