// ── Core error types ──
//
// Per-query errors. Every variant is reported back as structured data on
// the query that produced it; none of them abort a batch. The
// `From<nxquery_api::Error>` impl translates transport-layer errors into
// these variants.

use nxquery_api::StatusKind;
use thiserror::Error;

use crate::model::ResponseStatus;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("failed to load plugin settings: {message}")]
    Config { message: String },

    // ── Request construction ─────────────────────────────────────────
    #[error("failed to create request: {message}")]
    RequestBuild { message: String },

    /// The query's own JSON model or parameters are unusable.
    #[error("{message}")]
    InvalidQuery { message: String },

    #[error("unsupported query type '{query_type}'")]
    UnsupportedQueryType { query_type: String },

    // ── Transport ────────────────────────────────────────────────────
    #[error("failed to connect to server: {reason}")]
    ConnectionFailed { reason: String },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("query cancelled")]
    Cancelled,

    // ── Remote ───────────────────────────────────────────────────────
    #[error("Unauthorized: Invalid API key")]
    Unauthorized,

    #[error("{message}")]
    Api {
        status: u16,
        kind: StatusKind,
        message: String,
    },

    // ── Shaping ──────────────────────────────────────────────────────
    /// Remote JSON was malformed, empty, or had unparseable fields.
    #[error("{message}")]
    Shaping { message: String },
}

impl CoreError {
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    pub fn shaping(message: impl Into<String>) -> Self {
        Self::Shaping {
            message: message.into(),
        }
    }

    /// The response status reported to the caller for this error.
    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::Config { .. }
            | Self::RequestBuild { .. }
            | Self::InvalidQuery { .. }
            | Self::Shaping { .. } => ResponseStatus::BadRequest,
            Self::UnsupportedQueryType { .. } => ResponseStatus::NotImplemented,
            Self::ConnectionFailed { .. } => ResponseStatus::Internal,
            Self::Timeout { .. } => ResponseStatus::Timeout,
            Self::Cancelled => ResponseStatus::Cancelled,
            Self::Unauthorized => ResponseStatus::Unauthorized,
            Self::Api { kind, .. } => match kind {
                StatusKind::BadRequest => ResponseStatus::BadRequest,
                StatusKind::Unauthorized => ResponseStatus::Unauthorized,
                StatusKind::Forbidden => ResponseStatus::Forbidden,
                StatusKind::NotFound => ResponseStatus::NotFound,
                StatusKind::Internal => ResponseStatus::Internal,
                StatusKind::Unknown => ResponseStatus::Unknown,
            },
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nxquery_api::Error> for CoreError {
    fn from(err: nxquery_api::Error) -> Self {
        match err {
            nxquery_api::Error::InvalidApiKey => CoreError::Unauthorized,
            nxquery_api::Error::InvalidHeader(message) => CoreError::RequestBuild { message },
            nxquery_api::Error::InvalidUrl(e) => CoreError::RequestBuild {
                message: format!("invalid URL: {e}"),
            },
            nxquery_api::Error::Tls(message) => CoreError::Config { message },
            nxquery_api::Error::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            nxquery_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            nxquery_api::Error::Api {
                status,
                kind,
                message,
            } => CoreError::Api {
                status,
                kind,
                message,
            },
        }
    }
}
