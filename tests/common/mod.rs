//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceExt;

use telemetry_demo::config::AppConfig;
use telemetry_demo::http::HttpServer;
use telemetry_demo::lifecycle::Shutdown;
use telemetry_demo::observability::{MetricsSink, RequestLabels};

/// Records every metric event for later assertions.
#[derive(Default)]
pub struct CapturingMetrics {
    requests: Mutex<Vec<(RequestLabels, Duration)>>,
    errors: Mutex<Vec<(String, String)>>,
    home_visits: AtomicU64,
}

#[allow(dead_code)]
impl CapturingMetrics {
    pub fn requests(&self) -> Vec<(RequestLabels, Duration)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors.lock().unwrap().clone()
    }

    pub fn home_visits(&self) -> u64 {
        self.home_visits.load(Ordering::SeqCst)
    }
}

impl MetricsSink for CapturingMetrics {
    fn record_request(&self, labels: &RequestLabels, elapsed: Duration) {
        self.requests.lock().unwrap().push((labels.clone(), elapsed));
    }

    fn record_error(&self, path: &str, method: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((path.to_string(), method.to_string()));
    }

    fn record_home_visit(&self) {
        self.home_visits.fetch_add(1, Ordering::SeqCst);
    }
}

/// Default config with a short `/slow` delay.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.routes.slow_delay_ms = 300;
    config
}

/// Serve on an ephemeral port. Trigger the returned `Shutdown` to stop.
#[allow(dead_code)]
pub async fn spawn_server(config: AppConfig, metrics: Arc<CapturingMetrics>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, metrics);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Send one GET through the router without a socket.
#[allow(dead_code)]
pub async fn get(router: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
