//! Startup orchestration.
//!
//! Order: configuration, telemetry, logging, metrics sinks, listener, serve.
//! Any error before the listener is bound is fatal.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{self, AppConfig, ConfigError, ValidationError};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{
    logging, prometheus, MetricsFanout, PrometheusMetrics, Telemetry, TelemetryError,
};

/// Errors that stop the service from starting or running.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the metrics sinks for `config`: OTLP always, Prometheus on request.
pub fn build_metrics(config: &AppConfig, telemetry: &Telemetry) -> Result<MetricsFanout, StartupError> {
    let mut sinks = MetricsFanout::new();
    sinks.push(Arc::new(telemetry.metrics()));

    if let Some(addr) = &config.telemetry.prometheus_address {
        // Validation already checked the address.
        let addr: SocketAddr = addr.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidPrometheusAddress(addr.clone())])
        })?;
        prometheus::install(addr)?;
        sinks.push(Arc::new(PrometheusMetrics));
    }

    Ok(sinks)
}

/// Load configuration from the environment and run until a stop signal.
pub async fn run() -> Result<(), StartupError> {
    config::load_dotenv();
    run_with_lookup(|key| std::env::var(key).ok()).await
}

/// Load configuration through `lookup` and run. Configuration errors return
/// before telemetry starts or the listener is bound.
pub async fn run_with_lookup<F>(lookup: F) -> Result<(), StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = config::load_from_lookup(lookup)?;
    run_with_config(config).await
}

/// Run the service with an already validated configuration.
pub async fn run_with_config(config: AppConfig) -> Result<(), StartupError> {
    let telemetry = Telemetry::init(&config.telemetry)?;
    logging::init_logging(config.profile, Some(telemetry.tracer()))?;

    tracing::info!(
        service_name = %telemetry.service_name(),
        environment = config.telemetry.environment().as_deref().unwrap_or("unknown"),
        profile = %config.profile,
        debug = config.profile.is_debug(),
        testing = config.profile.is_testing(),
        endpoint = %config.telemetry.endpoint,
        export_interval_ms = config.telemetry.export_interval_ms,
        "Configuration loaded"
    );

    let metrics = build_metrics(&config, &telemetry)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::forward_signals(shutdown);

    let server = HttpServer::new(config, Arc::new(metrics));
    let served = server.run(listener, server_shutdown).await;

    // Flushing blocks on the exporters; keep it off the async workers.
    if let Err(e) = tokio::task::spawn_blocking(move || telemetry.shutdown()).await {
        tracing::error!(error = %e, "Telemetry shutdown task failed");
    }

    served?;
    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelemetryConfig;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_build_metrics_without_prometheus() {
        let config = AppConfig {
            telemetry: TelemetryConfig {
                service_name: "telemetry-demo-test".into(),
                resource_attributes: "deployment.environment=test".into(),
                endpoint: "http://127.0.0.1:1".into(),
                access_token: "token".into(),
                export_timeout_secs: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let telemetry = Telemetry::init(&config.telemetry).unwrap();

        let sinks = build_metrics(&config, &telemetry).unwrap();
        assert_eq!(sinks.len(), 1);

        tokio::task::spawn_blocking(move || telemetry.shutdown())
            .await
            .unwrap();
    }

    #[test]
    fn test_config_error_message() {
        let err = StartupError::from(ConfigError::Validation(vec![
            ValidationError::Missing("OTEL_SERVICE_NAME"),
        ]));
        assert!(err.to_string().starts_with("configuration error"));
    }
}
