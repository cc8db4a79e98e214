//! Configuration validation.
//!
//! Serde handles syntax; this module checks that every required value is
//! present and every range makes sense. All problems are reported, not just
//! the first one.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{parse_resource_attributes, AppConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required value {0}")]
    Missing(&'static str),

    #[error("malformed resource attribute '{0}' (expected key=value)")]
    MalformedResourceAttribute(String),

    #[error("invalid exporter endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid Prometheus address '{0}'")]
    InvalidPrometheusAddress(String),

    #[error("failure rate {0} is outside [0.0, 1.0]")]
    FailureRateOutOfRange(f64),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a fully assembled configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let telemetry = &config.telemetry;

    if telemetry.service_name.trim().is_empty() {
        errors.push(ValidationError::Missing("OTEL_SERVICE_NAME"));
    }

    if telemetry.resource_attributes.trim().is_empty() {
        errors.push(ValidationError::Missing("OTEL_RESOURCE_ATTRIBUTES"));
    } else {
        for entry in parse_resource_attributes(&telemetry.resource_attributes) {
            if let Err(raw) = entry {
                errors.push(ValidationError::MalformedResourceAttribute(raw));
            }
        }
    }

    if telemetry.endpoint.trim().is_empty() {
        errors.push(ValidationError::Missing("OTEL_EXPORTER_OTLP_ENDPOINT"));
    } else {
        match Url::parse(&telemetry.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::InvalidEndpoint {
                endpoint: telemetry.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidEndpoint {
                endpoint: telemetry.endpoint.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if telemetry.access_token.trim().is_empty() {
        errors.push(ValidationError::Missing("SIGNOZ_ACCESS_TOKEN"));
    }

    if telemetry.export_interval_ms == 0 {
        errors.push(ValidationError::Zero("export_interval_ms"));
    }

    if let Some(addr) = &telemetry.prometheus_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidPrometheusAddress(addr.clone()));
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("request_timeout_secs"));
    }

    let rate = config.routes.failure_rate;
    if !(0.0..=1.0).contains(&rate) {
        errors.push(ValidationError::FailureRateOutOfRange(rate));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
