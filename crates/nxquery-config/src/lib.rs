//! Profile configuration for nxquery.
//!
//! TOML profiles merged with `NXQUERY_` environment variables, API key
//! resolution (env var + keyring + plaintext), and translation to the
//! instance settings consumed by `nxquery_core::Settings::load`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use nxquery_core::InstanceSettings;
use nxquery_core::settings::API_KEY_FIELD;

/// Keyring service name; entries are stored as `{profile}/api-key`.
pub const KEYRING_SERVICE: &str = "nxquery";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named NetXMS server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}

/// A named NetXMS server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// WebAPI base URL (e.g., "https://netxms.example.com/webapi").
    #[serde(default)]
    pub server_address: String,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS certificate verification.
    pub insecure: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "nxquery", "nxquery").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nxquery");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file is not an error.
///
/// Nested keys use a double underscore, e.g.
/// `NXQUERY_PROFILES__LAB__SERVER_ADDRESS`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NXQUERY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an API key from the credential chain.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Instance settings ───────────────────────────────────────────────

/// Build the instance settings for a profile.
///
/// A missing API key is left out rather than reported, so the health
/// check can say so itself.
pub fn profile_to_instance_settings(
    profile: &Profile,
    profile_name: &str,
) -> Result<InstanceSettings, ConfigError> {
    let address = profile.server_address.trim();
    if !address.is_empty() {
        url::Url::parse(address).map_err(|e| ConfigError::Validation {
            field: "server_address".into(),
            reason: format!("invalid URL '{address}': {e}"),
        })?;
    }

    let mut secure = HashMap::new();
    match resolve_api_key(profile, profile_name) {
        Ok(key) => {
            secure.insert(API_KEY_FIELD.to_owned(), key.expose_secret().to_owned());
        }
        Err(ConfigError::NoCredentials { .. }) => {}
        Err(e) => return Err(e),
    }

    Ok(InstanceSettings {
        json_data: json!({
            "serverAddress": address,
            "tlsSkipVerify": profile.insecure.unwrap_or(false),
            "tlsCaCertPath": profile.ca_cert,
        }),
        decrypted_secure_json_data: secure,
    })
}
