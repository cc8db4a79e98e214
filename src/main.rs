//! Instrumented demo service.
//!
//! Serves four endpoints with different latency and failure behaviour and
//! reports a span per request plus request, error and duration metrics to an
//! OTLP backend such as SigNoz.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace span ─▶ hooks::before
//!                                                      │
//!                                                      ▼
//!                                               error boundary ─▶ handler
//!                                                      │             │
//!     Client Response                                  ▼             │
//!     ◀────────────── hooks::after ◀── sanitized 500 / payload ◀─────┘
//!                          │
//!                          ▼
//!                   MetricsSink ──▶ OTLP meter provider ──▶ backend
//!                               └─▶ Prometheus (optional)
//! ```
//!
//! # Environment
//! - `OTEL_SERVICE_NAME`, `OTEL_RESOURCE_ATTRIBUTES`,
//!   `OTEL_EXPORTER_OTLP_ENDPOINT`, `SIGNOZ_ACCESS_TOKEN` (required)
//! - `APP_ENV`, `APP_BIND_ADDRESS`, `APP_CONFIG`,
//!   `OTEL_METRIC_EXPORT_INTERVAL`, `PROMETHEUS_ADDRESS`, `RUST_LOG`

use std::process::ExitCode;

use telemetry_demo::lifecycle::startup;

#[tokio::main]
async fn main() -> ExitCode {
    match startup::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("telemetry-demo: {}", e);
            ExitCode::FAILURE
        }
    }
}
