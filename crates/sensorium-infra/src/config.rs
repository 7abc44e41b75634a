//! Configuration loader for Sensorium.
//!
//! Reads `sensorium.toml` and deserializes it into [`SensoriumConfig`].
//! `load_config` is lenient (missing or malformed files fall back to
//! defaults); `parse_config` is strict and reports what went wrong.

use std::path::Path;

use secrecy::SecretString;
use sensorium_types::config::{LlmSettings, SensoriumConfig};
use sensorium_types::error::ConfigError;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sensorium.toml";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`SensoriumConfig::default()`].
/// - If the file cannot be read or parsed, logs a warning and returns the default.
pub async fn load_config(path: &Path) -> SensoriumConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return SensoriumConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return SensoriumConfig::default();
        }
    };

    match parse_config(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            SensoriumConfig::default()
        }
    }
}

/// Read and parse `path`, failing on any error (including a missing file).
pub async fn read_config(path: &Path) -> Result<SensoriumConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    parse_config(&content)
}

/// Parse TOML text into a [`SensoriumConfig`].
pub fn parse_config(content: &str) -> Result<SensoriumConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Read the LLM API key from the environment variable named in `settings`.
pub fn resolve_api_key(settings: &LlmSettings) -> Result<SecretString, ConfigError> {
    resolve_api_key_with(settings, |name| std::env::var(name).ok())
}

/// Like [`resolve_api_key`], with an injectable variable lookup.
///
/// Empty values count as missing.
pub fn resolve_api_key_with<F>(settings: &LlmSettings, lookup: F) -> Result<SecretString, ConfigError>
where
    F: FnOnce(&str) -> Option<String>,
{
    match lookup(&settings.api_key_env) {
        Some(key) if !key.trim().is_empty() => Ok(SecretString::from(key)),
        _ => Err(ConfigError::MissingApiKey(settings.api_key_env.clone())),
    }
}
