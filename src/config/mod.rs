//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (dotenvy) + process environment
//! optional TOML file (APP_CONFIG)
//!     → loader.rs (parse file, overlay environment)
//!     → validation.rs (required values, ranges)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - Every field has a default except the telemetry identity and credentials
//! - A missing required value is fatal; the listener is never bound

pub mod loader;
pub mod profile;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_dotenv, load_from_lookup, ConfigError};
pub use profile::Profile;
pub use schema::{AppConfig, ListenerConfig, RoutesConfig, TelemetryConfig};
pub use validation::ValidationError;
