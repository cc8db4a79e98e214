//! Telemetry lifecycle.
//!
//! [`Telemetry`] owns the tracer and meter providers for the whole process.
//! It is built once at startup and handed to the subsystems that need it;
//! nothing here is registered as a process-global provider.

use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};

use crate::config::TelemetryConfig;
use crate::observability::metrics::{build_meter_provider, OtelMetrics};
use crate::observability::tracing::{build_resource, build_tracer_provider};
use crate::observability::TelemetryError;

const INSTRUMENTATION_SCOPE: &str = "telemetry-demo";

/// Tracer and meter providers bound to one service resource.
pub struct Telemetry {
    service_name: String,
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl Telemetry {
    /// Build both providers. Exporters connect lazily; a backend that is down
    /// only produces export errors inside the SDK.
    pub fn init(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let resource = build_resource(config);
        let tracer_provider = build_tracer_provider(config, resource.clone())?;
        let meter_provider = build_meter_provider(config, resource)?;

        Ok(Self {
            service_name: config.service_name.clone(),
            tracer_provider,
            meter_provider,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Tracer for the `tracing-opentelemetry` layer.
    pub fn tracer(&self) -> SdkTracer {
        self.tracer_provider.tracer(INSTRUMENTATION_SCOPE)
    }

    pub fn meter(&self) -> Meter {
        self.meter_provider.meter(INSTRUMENTATION_SCOPE)
    }

    /// Request instruments, created once from this provider's meter.
    pub fn metrics(&self) -> OtelMetrics {
        OtelMetrics::new(&self.meter())
    }

    /// Flush pending spans and metrics, then stop the exporters.
    ///
    /// Blocks until the SDK workers finish; call it from a blocking context.
    pub fn shutdown(self) {
        tracing::info!(service_name = %self.service_name, "Shutting down telemetry");

        if let Err(e) = self.tracer_provider.shutdown() {
            tracing::error!(error = %e, "Error shutting down tracer provider");
        }
        if let Err(e) = self.meter_provider.shutdown() {
            tracing::error!(error = %e, "Error shutting down meter provider");
        }
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("service_name", &self.service_name)
            .finish_non_exhaustive()
    }
}
