//! CLI error types with miette diagnostics.
//!
//! Per-query failures stay inside the batch response; only failures of the
//! command as a whole end up here.

use miette::Diagnostic;
use thiserror::Error;

use nxquery_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found")]
    #[diagnostic(
        code(nxquery::no_config),
        help(
            "Create a profile in {path}, or pass --server and --api-key.\n\
             Example:\n  [profiles.default]\n  server_address = \"https://netxms.example.com/webapi\""
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(nxquery::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nxquery::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(nxquery::config))]
    Config(ConfigError),

    // ── Commands ─────────────────────────────────────────────────────
    #[error("{failed} of {total} queries failed")]
    #[diagnostic(
        code(nxquery::query_failed),
        help("Each failed query's error is shown in the output above.")
    )]
    QueriesFailed { failed: usize, total: usize },

    #[error("Health check failed: {message}")]
    #[diagnostic(
        code(nxquery::unhealthy),
        help("Check server_address and the API key of the active profile.")
    )]
    Unhealthy { message: String },

    #[error("List request failed (HTTP {status}): {message}")]
    #[diagnostic(code(nxquery::list_failed))]
    ListFailed { status: u16, message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(nxquery::json), help("Check the JSON input and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { profile } => Self::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::Json(_) => exit_code::USAGE,
            Self::ListFailed { status, .. } => match status {
                401 => exit_code::AUTH,
                403 => exit_code::PERMISSION,
                404 => exit_code::NOT_FOUND,
                502 => exit_code::CONNECTION,
                504 => exit_code::TIMEOUT,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }
}
