//! Structured logging.
//!
//! # Design Decisions
//! - `tracing` + `tracing-subscriber`, initialized once in `main`
//! - Pretty format for debug/testing profiles, JSON for production
//! - `RUST_LOG` overrides the profile's default filter
//! - When a tracer is supplied, spans are also exported over OTLP

use opentelemetry_sdk::trace::SdkTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Profile;
use crate::observability::TelemetryError;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(profile: Profile) -> &'static str {
    if profile.is_debug() {
        "telemetry_demo=debug,tower_http=debug"
    } else {
        "telemetry_demo=info,tower_http=info"
    }
}

/// Install the global subscriber.
pub fn init_logging(profile: Profile, tracer: Option<SdkTracer>) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(profile).into());

    let otel_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let (pretty, json) = if profile == Profile::Production {
        (None, Some(fmt::layer().json().with_current_span(true)))
    } else {
        (Some(fmt::layer().pretty()), None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer)
        .with(pretty)
        .with(json)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))
}
