//! Request-level observability demo service.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod traffic;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::{MetricsSink, Telemetry};
