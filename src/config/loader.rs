//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::profile::{Profile, UnknownProfile};
use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
pub const ENV_RESOURCE_ATTRIBUTES: &str = "OTEL_RESOURCE_ATTRIBUTES";
pub const ENV_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub const ENV_ACCESS_TOKEN: &str = "SIGNOZ_ACCESS_TOKEN";
pub const ENV_METRIC_EXPORT_INTERVAL: &str = "OTEL_METRIC_EXPORT_INTERVAL";
pub const ENV_PROFILE: &str = "APP_ENV";
pub const ENV_BIND_ADDRESS: &str = "APP_BIND_ADDRESS";
pub const ENV_CONFIG_PATH: &str = "APP_CONFIG";
pub const ENV_PROMETHEUS_ADDRESS: &str = "PROMETHEUS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Profile(UnknownProfile),
    InvalidNumber { key: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Profile(e) => write!(f, "{}", e),
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{} must be a number, got '{}'", key, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay environment values onto `config`.
///
/// `lookup` abstracts `std::env::var` so callers (and tests) can supply any
/// source. Empty values count as unset.
pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_SERVICE_NAME) {
        config.telemetry.service_name = v;
    }
    if let Some(v) = get(ENV_RESOURCE_ATTRIBUTES) {
        config.telemetry.resource_attributes = v;
    }
    if let Some(v) = get(ENV_OTLP_ENDPOINT) {
        config.telemetry.endpoint = v;
    }
    if let Some(v) = get(ENV_ACCESS_TOKEN) {
        config.telemetry.access_token = v;
    }
    if let Some(v) = get(ENV_METRIC_EXPORT_INTERVAL) {
        config.telemetry.export_interval_ms = v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            key: ENV_METRIC_EXPORT_INTERVAL,
            value: v.clone(),
        })?;
    }
    if let Some(v) = get(ENV_PROMETHEUS_ADDRESS) {
        config.telemetry.prometheus_address = Some(v);
    }
    if let Some(v) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = v;
    }
    if let Some(v) = get(ENV_PROFILE) {
        config.profile = v.parse::<Profile>().map_err(ConfigError::Profile)?;
    }

    Ok(())
}

/// Build the configuration: optional TOML file, then environment, then validation.
pub fn load_config<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => AppConfig::default(),
    };

    apply_env(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load `.env` into the process environment.
///
/// Runs before the tracing subscriber exists, so a read failure is reported
/// on stderr. A missing file is normal outside local development.
pub fn load_dotenv() {
    if let Some(e) = dotenv_failure(dotenvy::dotenv()) {
        eprintln!("telemetry-demo: failed to read .env file: {}", e);
    }
}

fn dotenv_failure<T>(result: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}

/// Load through `lookup`, honouring `APP_CONFIG` for the optional TOML file.
pub fn load_from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = lookup(ENV_CONFIG_PATH).filter(|p| !p.trim().is_empty());
    load_config(path.as_deref().map(Path::new), lookup)
}
