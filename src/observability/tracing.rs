//! Distributed tracing export.
//!
//! # Responsibilities
//! - Describe the service with an OpenTelemetry resource
//! - Build the OTLP/HTTP span exporter with the backend access token
//! - Batch spans off the request path
//!
//! # Design Decisions
//! - Spans come from `tracing` via `tracing-opentelemetry`; one per request
//! - The provider is owned by `Telemetry`, never registered globally

use std::collections::HashMap;

use opentelemetry::KeyValue;
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use url::Url;

use crate::config::TelemetryConfig;
use crate::observability::TelemetryError;

/// Header carrying the SigNoz ingestion key.
pub const ACCESS_TOKEN_HEADER: &str = "signoz-access-token";

const TRACES_PATH: &str = "v1/traces";

/// Resource shared by traces and metrics.
///
/// Every parsed `OTEL_RESOURCE_ATTRIBUTES` pair is attached verbatim; the
/// first value is repeated under `application` for existing dashboards.
pub fn build_resource(config: &TelemetryConfig) -> Resource {
    let pairs = config.resource_pairs();
    let mut attributes: Vec<KeyValue> = pairs
        .iter()
        .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
        .collect();

    if let Some((_, environment)) = pairs.first() {
        attributes.push(KeyValue::new("application", environment.clone()));
    }

    Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attributes(attributes)
        .build()
}

/// Append an OTLP signal path to the configured base endpoint.
pub fn signal_endpoint(base: &str, signal: &str) -> Result<String, TelemetryError> {
    let mut url = Url::parse(base).map_err(|e| TelemetryError::InvalidEndpoint {
        endpoint: base.to_string(),
        reason: e.to_string(),
    })?;

    let prefix = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{}/{}", prefix, signal));
    Ok(url.to_string())
}

pub(crate) fn auth_headers(token: &str) -> HashMap<String, String> {
    HashMap::from([(ACCESS_TOKEN_HEADER.to_string(), token.to_string())])
}

/// Build the tracer provider with a batching OTLP/HTTP exporter.
pub fn build_tracer_provider(
    config: &TelemetryConfig,
    resource: Resource,
) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(signal_endpoint(&config.endpoint, TRACES_PATH)?)
        .with_headers(auth_headers(&config.access_token))
        .with_timeout(config.export_timeout())
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build())
}
