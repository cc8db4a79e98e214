//! Request metrics.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by path, method, status
//! - `http_request_errors_total` (counter): server errors by path, method
//! - `http_request_duration_seconds` (histogram): latency distribution
//! - `home_visits_total` (counter): calls to the welcome endpoint
//!
//! # Design Decisions
//! - The HTTP layer only sees [`MetricsSink`]; backends plug in behind it
//! - Instruments are created once and shared for the process lifetime
//! - Histogram buckets tuned for typical web latencies

use std::sync::Arc;
use std::time::Duration;

use opentelemetry::metrics::{Counter, Histogram, Meter};
use opentelemetry::KeyValue;
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::Resource;

use crate::config::TelemetryConfig;
use crate::observability::tracing::{auth_headers, signal_endpoint};
use crate::observability::TelemetryError;

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const ERRORS_TOTAL: &str = "http_request_errors_total";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const HOME_VISITS_TOTAL: &str = "home_visits_total";

pub const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

const METRICS_PATH: &str = "v1/metrics";

/// Labels attached to every per-request measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLabels {
    pub path: String,
    pub method: String,
    pub status: u16,
}

/// Destination for the metrics emitted by the HTTP layer.
///
/// Implementations must tolerate concurrent calls from many requests.
pub trait MetricsSink: Send + Sync {
    /// One finished request: increments the request counter and records
    /// `elapsed` into the duration histogram.
    fn record_request(&self, labels: &RequestLabels, elapsed: Duration);

    /// One request that ended in a server error.
    fn record_error(&self, path: &str, method: &str);

    /// One call to the welcome endpoint.
    fn record_home_visit(&self);
}

/// OpenTelemetry instruments, exported through the meter provider.
#[derive(Clone)]
pub struct OtelMetrics {
    requests: Counter<u64>,
    errors: Counter<u64>,
    duration: Histogram<f64>,
    home_visits: Counter<u64>,
}

impl OtelMetrics {
    pub fn new(meter: &Meter) -> Self {
        let requests = meter
            .u64_counter(REQUESTS_TOTAL)
            .with_description("Total number of requests")
            .build();
        let errors = meter
            .u64_counter(ERRORS_TOTAL)
            .with_description("Total number of errors")
            .build();
        let duration = meter
            .f64_histogram(REQUEST_DURATION)
            .with_description("Duration of requests")
            .with_unit("s")
            .with_boundaries(DURATION_BUCKETS.to_vec())
            .build();
        let home_visits = meter
            .u64_counter(HOME_VISITS_TOTAL)
            .with_description("Calls to the welcome endpoint")
            .build();

        Self {
            requests,
            errors,
            duration,
            home_visits,
        }
    }
}

impl MetricsSink for OtelMetrics {
    fn record_request(&self, labels: &RequestLabels, elapsed: Duration) {
        let attributes = [
            KeyValue::new("path", labels.path.clone()),
            KeyValue::new("method", labels.method.clone()),
            KeyValue::new("status", labels.status.to_string()),
        ];
        self.duration.record(elapsed.as_secs_f64(), &attributes);
        self.requests.add(1, &attributes);
    }

    fn record_error(&self, path: &str, method: &str) {
        self.errors.add(
            1,
            &[
                KeyValue::new("path", path.to_string()),
                KeyValue::new("method", method.to_string()),
            ],
        );
    }

    fn record_home_visit(&self) {
        self.home_visits.add(1, &[]);
    }
}

/// Forwards every measurement to each registered sink.
#[derive(Clone, Default)]
pub struct MetricsFanout {
    sinks: Vec<Arc<dyn MetricsSink>>,
}

impl MetricsFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Arc<dyn MetricsSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl MetricsSink for MetricsFanout {
    fn record_request(&self, labels: &RequestLabels, elapsed: Duration) {
        for sink in &self.sinks {
            sink.record_request(labels, elapsed);
        }
    }

    fn record_error(&self, path: &str, method: &str) {
        for sink in &self.sinks {
            sink.record_error(path, method);
        }
    }

    fn record_home_visit(&self) {
        for sink in &self.sinks {
            sink.record_home_visit();
        }
    }
}

/// Build the meter provider: OTLP/HTTP exporter behind a periodic reader.
pub fn build_meter_provider(
    config: &TelemetryConfig,
    resource: Resource,
) -> Result<SdkMeterProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_http()
        .with_endpoint(signal_endpoint(&config.endpoint, METRICS_PATH)?)
        .with_headers(auth_headers(&config.access_token))
        .with_timeout(config.export_timeout())
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(config.export_interval())
        .build();

    Ok(SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build())
}
