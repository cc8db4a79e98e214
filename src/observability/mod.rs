//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP hooks / error boundary
//!     → metrics.rs (MetricsSink: counters, histogram)
//!         → OtelMetrics → periodic reader → OTLP/HTTP
//!         → PrometheusMetrics → local scrape endpoint (optional)
//! tower-http TraceLayer span per request
//!     → logging.rs (fmt layer + tracing-opentelemetry layer)
//!     → tracing.rs (batch span exporter → OTLP/HTTP)
//! ```
//!
//! # Design Decisions
//! - Providers are explicit instances owned by `Telemetry`
//! - Export never blocks a request; SDK workers ship data in the background
//! - Export failures stay inside the SDK

use thiserror::Error;

pub mod logging;
pub mod metrics;
pub mod prometheus;
pub mod telemetry;
pub mod tracing;

pub use metrics::{MetricsFanout, MetricsSink, OtelMetrics, RequestLabels};
pub use prometheus::PrometheusMetrics;
pub use telemetry::Telemetry;

/// Errors raised while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid exporter endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to build OTLP exporter: {0}")]
    Exporter(String),

    #[error("failed to start Prometheus exporter: {0}")]
    Prometheus(String),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}
