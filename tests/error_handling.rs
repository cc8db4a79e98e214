//! The error boundary turns every server failure into the same response.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{middleware, routing::get, Router};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;

use telemetry_demo::config::RoutesConfig;
use telemetry_demo::http::error::{error_boundary, panic_response, AppError};
use telemetry_demo::http::hooks::track_request;
use telemetry_demo::http::AppState;

mod common;

/// Router with the production middleware around failing handlers.
fn failing_router(metrics: Arc<common::CapturingMetrics>) -> Router {
    let state = AppState {
        metrics,
        routes: RoutesConfig::default(),
    };

    Router::new()
        .route(
            "/internal",
            get(|| async { Err::<&'static str, _>(AppError::Internal("connection string leaked".into())) }),
        )
        .route("/panic", get(|| async {
            #[allow(unreachable_code)]
            let out: () = panic!("handler exploded");
            out
        }))
        .route(
            "/unavailable",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "backend down: 10.0.0.7") }),
        )
        .route("/ok", get(|| async { "fine" }))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(state.clone(), error_boundary))
        .layer(middleware::from_fn_with_state(state.clone(), track_request))
        .with_state(state)
}

#[tokio::test]
async fn test_every_failure_cause_yields_generic_body() {
    let metrics = Arc::new(common::CapturingMetrics::default());
    let router = failing_router(metrics.clone());

    for path in ["/internal", "/panic", "/unavailable"] {
        let (status, body) = common::get(&router, path).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", path);
        assert_eq!(body, json!({ "error": "An internal error occurred" }), "{}", path);
    }

    let errors = metrics.errors();
    assert_eq!(
        errors,
        vec![
            ("/internal".to_string(), "GET".to_string()),
            ("/panic".to_string(), "GET".to_string()),
            ("/unavailable".to_string(), "GET".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_error_count_matches_server_error_responses() {
    let metrics = Arc::new(common::CapturingMetrics::default());
    let router = failing_router(metrics.clone());

    for path in ["/ok", "/internal", "/ok", "/missing", "/panic"] {
        common::get(&router, path).await;
    }

    let requests = metrics.requests();
    let server_errors = requests.iter().filter(|(l, _)| l.status >= 500).count();
    assert_eq!(requests.len(), 5);
    assert_eq!(server_errors, 2);
    assert_eq!(metrics.errors().len(), server_errors);
}
