use std::time::Duration;

use clap::Parser;
use telemetry_demo::lifecycle::{signals, Shutdown};
use telemetry_demo::traffic::{TrafficConfig, TrafficGenerator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "traffic-gen")]
#[command(about = "Send randomized demo traffic to the telemetry demo service", long_about = None)]
struct Cli {
    /// Base URL of the service
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    url: String,

    /// Minimum pause between requests, in milliseconds
    #[arg(long, default_value_t = 100)]
    min_delay_ms: u64,

    /// Maximum pause between requests, in milliseconds
    #[arg(long, default_value_t = 1000)]
    max_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Stop after this many requests (runs forever when omitted)
    #[arg(short = 'n', long)]
    count: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "telemetry_demo=info,traffic_gen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if cli.min_delay_ms > cli.max_delay_ms {
        return Err(format!(
            "--min-delay-ms ({}) must not exceed --max-delay-ms ({})",
            cli.min_delay_ms, cli.max_delay_ms
        )
        .into());
    }

    let generator = TrafficGenerator::new(TrafficConfig {
        base_url: cli.url,
        min_delay: Duration::from_millis(cli.min_delay_ms),
        max_delay: Duration::from_millis(cli.max_delay_ms),
        request_timeout: Duration::from_secs(cli.timeout_secs),
        max_requests: cli.count,
    })?;

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    signals::forward_signals(shutdown.clone());

    let stats = generator.run(stop).await;
    println!(
        "Sent {} requests: {} ok, {} server errors, {} failed",
        stats.sent, stats.succeeded, stats.server_errors, stats.failed
    );

    Ok(())
}
