//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ServiceConfig, DEFAULT_PORT};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Resolve the listen port from a raw `PORT` value.
///
/// Unset and empty both fall back to [`DEFAULT_PORT`].
pub fn resolve_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => value.parse().map_err(|source| ConfigError::InvalidPort {
            value: value.to_string(),
            source,
        }),
    }
}

/// Overlay environment variables onto `config` using `lookup`.
///
/// `PORT` only overrides the file value when it is set and non-empty.
pub fn apply_env<F>(config: ServiceConfig, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = overlay_env(config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn overlay_env<F>(mut config: ServiceConfig, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
        config.listener.port = resolve_port(Some(&raw))?;
    }
    Ok(config)
}

/// Build the runtime configuration from the process environment.
///
/// Precedence: `port_override` (the `--port` flag), then `PORT`, then the
/// optional file, then defaults. Validation runs once on the merged result.
pub fn load(path: Option<&Path>, port_override: Option<u16>) -> Result<ServiceConfig, ConfigError> {
    load_with(path, port_override, |key| std::env::var(key).ok())
}

/// [`load`] with an injectable environment lookup.
pub fn load_with<F>(
    path: Option<&Path>,
    port_override: Option<u16>,
    lookup: F,
) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match path {
        Some(path) => read_config(path)?,
        None => ServiceConfig::default(),
    };
    let mut config = overlay_env(base, lookup)?;
    if let Some(port) = port_override {
        config.listener.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
