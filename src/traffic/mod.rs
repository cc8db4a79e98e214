//! Synthetic traffic generation.
//!
//! A single sequential loop that keeps the demo service busy so dashboards
//! have something to show. It only talks plain HTTP to the service and
//! survives any network failure.

pub mod generator;

pub use generator::{Outcome, TrafficConfig, TrafficGenerator, TrafficStats, ENDPOINTS};
