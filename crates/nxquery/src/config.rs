//! CLI configuration: thin wrapper around `nxquery_config`.
//!
//! Adds `GlobalOpts` flag overrides (--server, --api-key, --insecure) on
//! top of profile resolution.

use nxquery_config::{Config, Profile, config_path, load_config_or_default};
use nxquery_core::InstanceSettings;
use nxquery_core::settings::API_KEY_FIELD;
use serde_json::Value;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Build the data source instance settings for this invocation.
pub fn instance_settings(global: &GlobalOpts) -> Result<InstanceSettings, CliError> {
    let cfg = load_config_or_default();
    instance_settings_from(&cfg, global)
}

/// Profile values, overridden by CLI flags.
pub fn instance_settings_from(
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<InstanceSettings, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let fallback = Profile::default();
    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile,
        // An explicitly named profile must exist.
        None if global.profile.is_some() => {
            let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: names.join(", "),
            });
        }
        None if global.server.is_some() => &fallback,
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let mut settings = nxquery_config::profile_to_instance_settings(profile, &profile_name)?;

    if let Value::Object(ref mut json) = settings.json_data {
        if let Some(ref server) = global.server {
            json.insert("serverAddress".into(), Value::from(server.trim()));
        }
        if global.insecure || cfg.defaults.insecure {
            json.insert("tlsSkipVerify".into(), Value::Bool(true));
        }
    }
    if let Some(ref key) = global.api_key {
        settings
            .decrypted_secure_json_data
            .insert(API_KEY_FIELD.to_owned(), key.clone());
    }

    Ok(settings)
}
