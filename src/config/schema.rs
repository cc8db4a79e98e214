//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits so non-secret settings can come from a TOML
//! file; the telemetry identity and credentials normally come from the
//! environment (see `loader`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::profile::Profile;

/// Root configuration for the demo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Profile selected by `APP_ENV`.
    pub profile: Profile,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Telemetry identity and export settings.
    pub telemetry: TelemetryConfig,

    /// Behaviour of the demo endpoints.
    pub routes: RoutesConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Telemetry identity and exporter settings.
///
/// The string fields start empty; validation rejects a config in which any
/// of them is still empty once the environment has been applied.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `service.name` resource attribute.
    pub service_name: String,

    /// Raw `key=value[,key=value]` resource attribute string.
    pub resource_attributes: String,

    /// OTLP/HTTP base endpoint (e.g., "https://ingest.eu.signoz.cloud:443").
    pub endpoint: String,

    /// Value sent in the `signoz-access-token` header.
    #[serde(skip_serializing)]
    pub access_token: String,

    /// Metric export interval in milliseconds.
    pub export_interval_ms: u64,

    /// Exporter request timeout in seconds.
    pub export_timeout_secs: u64,

    /// Optional bind address for a local Prometheus scrape endpoint.
    pub prometheus_address: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            resource_attributes: String::new(),
            endpoint: String::new(),
            access_token: String::new(),
            export_interval_ms: 15_000,
            export_timeout_secs: 10,
            prometheus_address: None,
        }
    }
}

impl TelemetryConfig {
    pub fn export_interval(&self) -> Duration {
        Duration::from_millis(self.export_interval_ms)
    }

    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }

    /// Parsed resource attributes, in the order given.
    ///
    /// Entries without a `=` are skipped here; validation reports them.
    pub fn resource_pairs(&self) -> Vec<(String, String)> {
        parse_resource_attributes(&self.resource_attributes)
            .into_iter()
            .filter_map(Result::ok)
            .collect()
    }

    /// The environment label: value of the first resource attribute.
    pub fn environment(&self) -> Option<String> {
        self.resource_pairs().into_iter().next().map(|(_, v)| v)
    }
}

/// Split a `key=value,key=value` string. Malformed entries are returned as `Err`
/// holding the offending text.
pub fn parse_resource_attributes(raw: &str) -> Vec<Result<(String, String), String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() && !v.trim().is_empty() => {
                Ok((k.trim().to_string(), v.trim().to_string()))
            }
            _ => Err(entry.to_string()),
        })
        .collect()
}

/// Behaviour of the demo endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Artificial delay of `/slow` in milliseconds.
    pub slow_delay_ms: u64,

    /// Probability that `/error` fails, in `[0.0, 1.0]`.
    pub failure_rate: f64,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            slow_delay_ms: 2_000,
            failure_rate: 0.5,
        }
    }
}

impl RoutesConfig {
    pub fn slow_delay(&self) -> Duration {
        Duration::from_millis(self.slow_delay_ms)
    }
}
