//! Local Prometheus scrape endpoint.
//!
//! Mirrors the OTLP request metrics through the `metrics` facade so a
//! Prometheus server can scrape the process directly.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

use crate::observability::metrics::{
    MetricsSink, RequestLabels, DURATION_BUCKETS, ERRORS_TOTAL, HOME_VISITS_TOTAL,
    REQUESTS_TOTAL, REQUEST_DURATION,
};
use crate::observability::TelemetryError;

/// Install the global recorder and start the HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn install(addr: SocketAddr) -> Result<(), TelemetryError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), DURATION_BUCKETS)
        .map_err(|e| TelemetryError::Prometheus(e.to_string()))?
        .install()
        .map_err(|e| TelemetryError::Prometheus(e.to_string()))?;

    tracing::info!(address = %addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Records through the `metrics` macros; a no-op until [`install`] has run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusMetrics;

impl MetricsSink for PrometheusMetrics {
    fn record_request(&self, labels: &RequestLabels, elapsed: Duration) {
        let path = labels.path.clone();
        let method = labels.method.clone();
        let status = labels.status.to_string();

        metrics::histogram!(
            REQUEST_DURATION,
            "path" => path.clone(),
            "method" => method.clone(),
            "status" => status.clone()
        )
        .record(elapsed.as_secs_f64());
        metrics::counter!(REQUESTS_TOTAL, "path" => path, "method" => method, "status" => status)
            .increment(1);
    }

    fn record_error(&self, path: &str, method: &str) {
        metrics::counter!(ERRORS_TOTAL, "path" => path.to_string(), "method" => method.to_string())
            .increment(1);
    }

    fn record_home_visit(&self) {
        metrics::counter!(HOME_VISITS_TOTAL).increment(1);
    }
}
