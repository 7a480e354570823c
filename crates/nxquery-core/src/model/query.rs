// ── Queries ──
//
// Incoming batch requests. Each query keeps its model as raw JSON bytes
// so a malformed model fails only that query.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Query types understood by the router.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum QueryType {
    Alarms,
    DciValues,
    SummaryTables,
    ObjectQueries,
    ObjectStatus,
}

/// Absolute time range of a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// One query of a batch, as received.
#[derive(Debug, Clone)]
pub struct DataQuery {
    pub ref_id: String,
    /// Declared query type; parsed by the router so unknown types stay per-query.
    pub query_type: String,
    pub time_range: TimeRange,
    /// The query model, unparsed.
    pub json: Bytes,
}

/// A batch of queries.
#[derive(Debug, Clone, Default)]
pub struct QueryDataRequest {
    pub queries: Vec<DataQuery>,
}

/// Model fields that a query handler may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    SourceObjectId,
    DciId,
    SummaryTableId,
    ObjectQueryId,
}

impl QueryField {
    pub fn name(self) -> &'static str {
        match self {
            Self::SourceObjectId => "sourceObjectId",
            Self::DciId => "dciId",
            Self::SummaryTableId => "summaryTableId",
            Self::ObjectQueryId => "objectQueryId",
        }
    }
}

/// Editor-provided model of a query.
///
/// Identifiers are accepted as JSON strings or numbers; empty strings
/// count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryModel {
    #[serde(default, deserialize_with = "de_id")]
    pub source_object_id: Option<String>,
    #[serde(default, deserialize_with = "de_id")]
    pub dci_id: Option<String>,
    #[serde(default, deserialize_with = "de_id")]
    pub summary_table_id: Option<String>,
    #[serde(default, deserialize_with = "de_id")]
    pub object_query_id: Option<String>,
    /// JSON array of parameter entries, encoded as a string.
    #[serde(default)]
    pub query_parameters: Option<String>,
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(
        match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_owned()),
            Some(Raw::Int(n)) => Some(n.to_string()),
            _ => None,
        },
    )
}

impl QueryModel {
    /// Parse a query's raw model.
    pub fn parse(json: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(json)
            .map_err(|e| CoreError::invalid_query(format!("json unmarshal: {e}")))
    }

    pub fn get(&self, field: QueryField) -> Option<&str> {
        match field {
            QueryField::SourceObjectId => self.source_object_id.as_deref(),
            QueryField::DciId => self.dci_id.as_deref(),
            QueryField::SummaryTableId => self.summary_table_id.as_deref(),
            QueryField::ObjectQueryId => self.object_query_id.as_deref(),
        }
    }

    /// Numeric identifier of an optional field.
    pub fn optional_id(&self, field: QueryField) -> Result<Option<i64>, CoreError> {
        self.get(field)
            .map(|raw| {
                raw.parse::<i64>().map_err(|e| {
                    CoreError::invalid_query(format!("invalid {}: {e}", field.name()))
                })
            })
            .transpose()
    }

    /// Numeric identifier of a mandatory field.
    pub fn require_id(&self, field: QueryField) -> Result<i64, CoreError> {
        self.optional_id(field)?
            .ok_or_else(|| CoreError::invalid_query(format!("missing {}", field.name())))
    }

    /// Check that every listed field is present, failing with its message.
    pub fn validate_required(&self, required: &[(QueryField, &str)]) -> Result<(), CoreError> {
        match required.iter().find(|(field, _)| self.get(*field).is_none()) {
            Some((_, message)) => Err(CoreError::invalid_query(*message)),
            None => Ok(()),
        }
    }

    /// Decode `queryParameters`; absent or blank means no parameters.
    ///
    /// Only the outer array is checked; entries are passed on untouched.
    pub fn query_parameters(&self) -> Result<Vec<Value>, CoreError> {
        match self.query_parameters.as_deref().map(str::trim) {
            None | Some("") => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| CoreError::invalid_query(format!("invalid queryParameters: {e}"))),
        }
    }
}
