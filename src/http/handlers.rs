//! Demo route handlers.

use axum::{extract::State, Json};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::server::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to the Flask SigNoz Demo!";
pub const FAST_MESSAGE: &str = "This is a fast response!";
pub const SLOW_MESSAGE: &str = "This is a slow response!";
pub const NO_ERROR_MESSAGE: &str = "No error this time!";

/// Success payload shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(text: &str) -> Json<Self> {
        Json(Self {
            message: text.to_string(),
        })
    }
}

/// `GET /`
pub async fn home(State(state): State<AppState>) -> Json<Message> {
    state.metrics.record_home_visit();
    Message::new(WELCOME_MESSAGE)
}

/// `GET /fast`
pub async fn fast() -> Json<Message> {
    Message::new(FAST_MESSAGE)
}

/// `GET /slow`: waits for the configured delay first.
pub async fn slow(State(state): State<AppState>) -> Json<Message> {
    tokio::time::sleep(state.routes.slow_delay()).await;
    Message::new(SLOW_MESSAGE)
}

/// `GET /error`: fails with probability `failure_rate`.
pub async fn error(State(state): State<AppState>) -> Result<Json<Message>, AppError> {
    if should_fail(state.routes.failure_rate) {
        return Err(AppError::RandomFailure);
    }
    Ok(Message::new(NO_ERROR_MESSAGE))
}

fn should_fail(failure_rate: f64) -> bool {
    rand::thread_rng().gen_bool(failure_rate.clamp(0.0, 1.0))
}
