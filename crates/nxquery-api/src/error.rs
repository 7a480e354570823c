use thiserror::Error;

/// Coarse classification of a non-success HTTP status returned by the
/// NetXMS server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Internal,
    Unknown,
}

impl StatusKind {
    /// Classify a raw HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500..=599 => Self::Internal,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Internal => "internal server error",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Top-level error type for the `nxquery-api` crate.
///
/// Covers authentication, transport, request construction, remote
/// application errors and response decoding. `nxquery-core` maps these
/// into per-query diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// HTTP 401. Reported the same way whatever the response body says.
    #[error("Unauthorized: Invalid API key")]
    InvalidApiKey,

    /// The API key cannot be encoded as an HTTP header value.
    #[error("invalid Authorization header value: {0}")]
    InvalidHeader(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, body read).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote application ──────────────────────────────────────────
    /// Non-success status other than 401. `message` carries the server's
    /// `reason` field when the body had one.
    #[error("{message} (HTTP {status}, {kind})")]
    Api {
        status: u16,
        kind: StatusKind,
        message: String,
    },
}

impl Error {
    /// Returns `true` if the request never produced a usable response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }
}
