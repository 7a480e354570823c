// ── Batch responses ──
//
// One `DataResponse` per refId, success or failure, in input order.

use indexmap::IndexMap;
use serde::Serialize;

use super::frame::Frame;
use crate::error::CoreError;

/// Outcome classification of a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    Ok,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Internal,
    NotImplemented,
    Timeout,
    Cancelled,
    Unknown,
}

/// Error attached to a failed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryError {
    pub status: ResponseStatus,
    pub message: String,
}

/// Result of one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<QueryError>,
}

impl DataResponse {
    pub fn frames(frames: Vec<Frame>) -> Self {
        Self {
            status: ResponseStatus::Ok,
            frames,
            error: None,
        }
    }

    pub fn error(err: &CoreError) -> Self {
        let status = err.status();
        Self {
            status,
            frames: Vec::new(),
            error: Some(QueryError {
                status,
                message: err.to_string(),
            }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl From<Result<Vec<Frame>, CoreError>> for DataResponse {
    fn from(result: Result<Vec<Frame>, CoreError>) -> Self {
        match result {
            Ok(frames) => Self::frames(frames),
            Err(err) => Self::error(&err),
        }
    }
}

/// Results of a batch, keyed by refId in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryDataResponse {
    pub responses: IndexMap<String, DataResponse>,
}

impl QueryDataResponse {
    pub fn get(&self, ref_id: &str) -> Option<&DataResponse> {
        self.responses.get(ref_id)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}
