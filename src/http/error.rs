//! Centralized failure handling.
//!
//! Handlers report failures as [`AppError`]; panics are caught by
//! `CatchPanicLayer` and turned into the same response. The
//! [`error_boundary`] middleware sees every server-error response, counts it,
//! logs the cause and replaces the body with the generic payload so internal
//! error text never reaches the client.

use std::any::Any;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::hooks::RequestStart;
use crate::http::request::{request_id, route_label};
use crate::http::server::AppState;

/// The only error text a client ever sees.
pub const GENERIC_ERROR: &str = "An internal error occurred";

/// Failure raised by a route handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Random error occurred!")]
    RandomFailure,

    #[error("{0}")]
    Internal(String),
}

/// Body of every 500 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Cause of a failure, carried from the handler to the boundary in the
/// response extensions. Never serialized.
#[derive(Debug, Clone)]
pub struct FailureCause(pub String);

/// The sanitized 500 response.
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: GENERIC_ERROR.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = internal_error_response();
        response.extensions_mut().insert(FailureCause(self.to_string()));
        response
    }
}

/// `CatchPanicLayer` handler: turns a handler panic into the generic 500.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    let mut response = internal_error_response();
    response
        .extensions_mut()
        .insert(FailureCause(format!("panic: {}", message)));
    response
}

/// Middleware that owns every server-error response.
pub async fn error_boundary(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = route_label(&request);
    let method = request.method().clone();
    let request_id = request_id(&request).to_string();
    let stamped = request.extensions().get::<RequestStart>().copied();

    let response = next.run(request).await;
    let status = response.status();
    if !status.is_server_error() {
        return response;
    }

    state.metrics.record_error(&path, method.as_str());

    let cause = response
        .extensions()
        .get::<FailureCause>()
        .map(|c| c.0.as_str())
        .unwrap_or("unhandled server error");
    tracing::error!(
        request_id = %request_id,
        path = %path,
        method = %method,
        status = status.as_u16(),
        elapsed_ms = stamped.map(|start| start.elapsed().as_millis() as u64),
        "An error occurred: {}",
        cause
    );

    internal_error_response()
}
