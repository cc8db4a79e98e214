//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the demo handlers
//! - Wire up middleware (request ID, tracing, lifecycle hooks, error
//!   boundary, timeout, panic catching)
//! - Bind server to listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, RoutesConfig};
use crate::http::request::{request_id, route_label, MakeRequestUuid};
use crate::http::{error, handlers, hooks};
use crate::observability::MetricsSink;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<dyn MetricsSink>,
    pub routes: RoutesConfig,
}

/// HTTP server for the demo service.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server emitting metrics into `metrics`.
    pub fn new(config: AppConfig, metrics: Arc<dyn MetricsSink>) -> Self {
        let state = AppState {
            metrics,
            routes: config.routes.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Outermost first: request ID, trace span, lifecycle hooks, error
    /// boundary, timeout, panic catching, handler.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::home))
            .route("/fast", get(handlers::fast))
            .route("/slow", get(handlers::slow))
            .route("/error", get(handlers::error))
            .layer(CatchPanicLayer::custom(error::panic_response))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(middleware::from_fn_with_state(state.clone(), error::error_boundary))
            .layer(middleware::from_fn_with_state(state.clone(), hooks::track_request))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let route = route_label(request);
                tracing::info_span!(
                    "http_request",
                    otel.name = %format!("{} {}", request.method(), route),
                    otel.kind = "server",
                    otel.status_code = tracing::field::Empty,
                    method = %request.method(),
                    path = %route,
                    request_id = %request_id(request),
                    status = tracing::field::Empty,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving on a custom listener or for
    /// in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            profile = %self.config.profile,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
