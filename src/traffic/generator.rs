//! Randomized request loop.

use std::time::Duration;

use tokio::sync::broadcast;

/// Endpoints exercised by the generator.
pub const ENDPOINTS: [&str; 4] = ["/", "/fast", "/slow", "/error"];

/// Generator settings.
#[derive(Debug, Clone)]
pub struct TrafficConfig {
    /// Base URL of the service (e.g., "http://127.0.0.1:5000").
    pub base_url: String,

    /// Lower bound of the pause between requests.
    pub min_delay: Duration,

    /// Upper bound of the pause between requests.
    pub max_delay: Duration,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Stop after this many requests; `None` runs until shutdown.
    pub max_requests: Option<u64>,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(10),
            max_requests: None,
        }
    }
}

/// Result of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The service answered with this status code.
    Status(u16),
    /// The request never got a response.
    Failed(String),
}

/// Running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficStats {
    pub sent: u64,
    pub succeeded: u64,
    pub server_errors: u64,
    pub failed: u64,
}

impl TrafficStats {
    fn record(&mut self, outcome: &Outcome) {
        self.sent += 1;
        match outcome {
            Outcome::Status(status) if *status >= 500 => self.server_errors += 1,
            Outcome::Status(_) => self.succeeded += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

pub struct TrafficGenerator {
    client: reqwest::Client,
    config: TrafficConfig,
}

impl TrafficGenerator {
    pub fn new(config: TrafficConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .no_proxy()
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TrafficConfig {
        &self.config
    }

    /// Uniformly random endpoint.
    pub fn pick_endpoint() -> &'static str {
        ENDPOINTS[fastrand::usize(..ENDPOINTS.len())]
    }

    /// Uniformly random pause in `[min_delay, max_delay]`.
    pub fn next_delay(&self) -> Duration {
        let min = self.config.min_delay;
        let max = self.config.max_delay.max(min);
        min + (max - min).mul_f64(fastrand::f64())
    }

    /// Issue one GET and log what happened.
    pub async fn send_one(&self, endpoint: &str) -> Outcome {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        match self.client.get(&url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::info!(endpoint, status, "Request to {}: Status {}", endpoint, status);
                Outcome::Status(status)
            }
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "Error making request to {}", endpoint);
                Outcome::Failed(e.to_string())
            }
        }
    }

    /// Loop until `shutdown` fires or `max_requests` is reached.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> TrafficStats {
        let mut stats = TrafficStats::default();
        tracing::info!(base_url = %self.config.base_url, "Starting to generate traffic");

        loop {
            if self.config.max_requests.is_some_and(|max| stats.sent >= max) {
                break;
            }

            let endpoint = Self::pick_endpoint();
            let outcome = tokio::select! {
                outcome = self.send_one(endpoint) => outcome,
                _ = shutdown.recv() => break,
            };
            stats.record(&outcome);

            if self.config.max_requests.is_some_and(|max| stats.sent >= max) {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.next_delay()) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(
            sent = stats.sent,
            succeeded = stats.succeeded,
            server_errors = stats.server_errors,
            failed = stats.failed,
            "Traffic generation stopped"
        );
        stats
    }
}
