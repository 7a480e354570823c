// ── Data source settings ──
//
// `Settings::load` is the `LoadSettings` contract: it turns the host's
// instance settings into a server address and API key. It is called for
// every query, list call and health check; nothing is cached.

use std::collections::HashMap;
use std::path::PathBuf;

use nxquery_api::{NetXmsClient, TlsMode, TransportConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Key of the API key in the decrypted secure settings.
pub const API_KEY_FIELD: &str = "apiKey";

/// Raw settings as handed over by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSettings {
    /// Non-secret JSON settings (`serverAddress`, TLS options).
    #[serde(default)]
    pub json_data: serde_json::Value,
    /// Decrypted secrets (`apiKey`).
    #[serde(default)]
    pub decrypted_secure_json_data: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonData {
    #[serde(default)]
    server_address: String,
    #[serde(default)]
    tls_skip_verify: bool,
    #[serde(default)]
    tls_ca_cert_path: Option<PathBuf>,
}

/// Resolved connection settings for one request.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server_address: String,
    pub api_key: SecretString,
    pub tls: TlsMode,
}

impl Settings {
    /// Read settings from the host's instance settings.
    ///
    /// Empty values are not an error here; callers decide how to report them.
    pub fn load(instance: &InstanceSettings) -> Result<Self, CoreError> {
        let json: JsonData = if instance.json_data.is_null() {
            JsonData::default()
        } else {
            serde_json::from_value(instance.json_data.clone()).map_err(|e| CoreError::Config {
                message: e.to_string(),
            })?
        };

        let api_key = instance
            .decrypted_secure_json_data
            .get(API_KEY_FIELD)
            .cloned()
            .unwrap_or_default();

        let tls = if json.tls_skip_verify {
            TlsMode::DangerAcceptInvalid
        } else if let Some(path) = json.tls_ca_cert_path {
            TlsMode::CustomCa(path)
        } else {
            TlsMode::System
        };

        Ok(Self {
            server_address: json.server_address.trim().to_owned(),
            api_key: SecretString::from(api_key),
            tls,
        })
    }

    pub fn has_server_address(&self) -> bool {
        !self.server_address.is_empty()
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Build a fresh client for this request.
    pub fn client(&self) -> Result<NetXmsClient, CoreError> {
        if !self.has_server_address() {
            return Err(CoreError::Config {
                message: "Server address is missing".into(),
            });
        }
        let transport = TransportConfig::new(self.tls.clone());
        Ok(NetXmsClient::from_api_key(
            &self.server_address,
            &self.api_key,
            &transport,
        )?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instance(json_data: serde_json::Value, key: Option<&str>) -> InstanceSettings {
        InstanceSettings {
            json_data,
            decrypted_secure_json_data: key
                .map(|k| HashMap::from([(API_KEY_FIELD.to_owned(), k.to_owned())]))
                .unwrap_or_default(),
        }
    }

    #[test]
    fn loads_address_and_key() {
        let settings = Settings::load(&instance(
            json!({ "serverAddress": " https://nx.example.com/ " }),
            Some("secret"),
        ))
        .unwrap();
        assert_eq!(settings.server_address, "https://nx.example.com/");
        assert_eq!(settings.api_key.expose_secret(), "secret");
        assert_eq!(settings.tls, TlsMode::System);
    }

    #[test]
    fn missing_values_load_as_empty() {
        let settings = Settings::load(&instance(serde_json::Value::Null, None)).unwrap();
        assert!(!settings.has_server_address());
        assert!(!settings.has_api_key());
        assert!(matches!(settings.client(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn tls_options() {
        let skip = Settings::load(&instance(
            json!({ "serverAddress": "https://nx", "tlsSkipVerify": true }),
            None,
        ))
        .unwrap();
        assert_eq!(skip.tls, TlsMode::DangerAcceptInvalid);

        let ca = Settings::load(&instance(
            json!({ "serverAddress": "https://nx", "tlsCaCertPath": "/etc/nx/ca.pem" }),
            None,
        ))
        .unwrap();
        assert_eq!(ca.tls, TlsMode::CustomCa("/etc/nx/ca.pem".into()));
    }

    #[test]
    fn unreadable_json_data_is_config_error() {
        let result = Settings::load(&instance(json!(["not", "an", "object"]), None));
        assert!(matches!(result, Err(CoreError::Config { .. })));
    }
}
