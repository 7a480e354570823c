// ── Health check ──
//
// Connectivity and compatibility check for a configured data source.
// Reports a single pass/fail result with a message; never errors.

use nxquery_api::StatusKind;
use nxquery_api::models::ServerInfo;
use serde::Serialize;
use tracing::info;

use crate::router::Datasource;
use crate::version::is_version_greater_or_equal;

/// Oldest NetXMS server version this bridge works with.
pub const MIN_SERVER_VERSION: &str = "5.2.4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthCheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Ok,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

impl Datasource {
    /// Check settings, reachability and server version.
    pub async fn check_health(&self) -> HealthCheckResult {
        let result = self.run_health_check().await;
        info!(status = %result.status, message = %result.message, "health check");
        result
    }

    async fn run_health_check(&self) -> HealthCheckResult {
        let Ok(settings) = self.settings() else {
            return HealthCheckResult::error("Unable to load settings");
        };
        if !settings.has_server_address() {
            return HealthCheckResult::error("Server address is missing");
        }
        if !settings.has_api_key() {
            return HealthCheckResult::error("API key is missing");
        }

        let client = match settings.client() {
            Ok(client) => client,
            Err(e) => return HealthCheckResult::error(format!("Unable to create client: {e}")),
        };
        let response = match client.server_info().await {
            Ok(response) => response,
            Err(e) => return HealthCheckResult::error(format!("Failed to connect to server: {e}")),
        };

        if response.status != 200 {
            return HealthCheckResult::error(format!(
                "Server returned status code: {} ({})",
                response.status,
                StatusKind::from_status(response.status)
            ));
        }

        let version = serde_json::from_slice::<ServerInfo>(&response.body)
            .ok()
            .and_then(|info| info.version)
            .filter(|v| !v.trim().is_empty());
        let Some(version) = version else {
            return HealthCheckResult::error("Server response does not contain version information");
        };

        if !is_version_greater_or_equal(&version, MIN_SERVER_VERSION) {
            return HealthCheckResult::error(format!(
                "NetXMS server version {version} is not supported (minimum {MIN_SERVER_VERSION})"
            ));
        }

        HealthCheckResult::ok("Data source is working")
    }
}
