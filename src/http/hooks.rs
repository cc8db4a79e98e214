//! Request lifecycle hooks.
//!
//! `before` runs ahead of every handler and stamps the request with a
//! monotonic start time that inner layers can read back (the error
//! boundary logs it). `after` runs once the final response exists (also
//! when the error boundary replaced it) and emits one duration sample plus
//! one request count, labeled `{path, method, status}`.

use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::http::request::route_label;
use crate::http::server::AppState;
use crate::observability::{MetricsSink, RequestLabels};

/// Start time of the in-flight request, stored in its extensions.
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

impl RequestStart {
    pub fn now() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Stamp the request and return the stamp.
pub fn before<B>(request: &mut axum::http::Request<B>) -> RequestStart {
    let start = RequestStart::now();
    request.extensions_mut().insert(start);
    start
}

/// Emit the per-request metrics. Returns the measured duration.
pub fn after(metrics: &dyn MetricsSink, labels: &RequestLabels, start: RequestStart) -> Duration {
    let elapsed = start.elapsed();
    metrics.record_request(labels, elapsed);

    tracing::debug!(
        duration_secs = elapsed.as_secs_f64(),
        path = %labels.path,
        method = %labels.method,
        status = labels.status,
        "Recorded request duration"
    );
    elapsed
}

/// Middleware wrapping every route with `before` and `after`.
pub async fn track_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let start = before(&mut request);
    let path = route_label(&request);
    let method = request.method().to_string();

    let response = next.run(request).await;

    let status = response.status();
    let span = tracing::Span::current();
    span.record("status", status.as_u16());
    if status.is_server_error() {
        span.record("otel.status_code", "ERROR");
    }

    let labels = RequestLabels {
        path,
        method,
        status: status.as_u16(),
    };
    after(state.metrics.as_ref(), &labels, start);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Samples(Mutex<Vec<(RequestLabels, Duration)>>);

    impl MetricsSink for Samples {
        fn record_request(&self, labels: &RequestLabels, elapsed: Duration) {
            self.0.lock().unwrap().push((labels.clone(), elapsed));
        }
        fn record_error(&self, _path: &str, _method: &str) {}
        fn record_home_visit(&self) {}
    }

    #[test]
    fn test_before_stamps_extensions() {
        let mut request = axum::http::Request::new(());
        let start = before(&mut request);
        let stored = request.extensions().get::<RequestStart>().unwrap();
        assert_eq!(stored.0, start.0);
    }

    #[tokio::test]
    async fn test_stamp_visible_to_inner_layers() {
        use std::sync::Arc;

        use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
        use tower::ServiceExt;

        use crate::config::RoutesConfig;

        let state = AppState {
            metrics: Arc::new(Samples::default()),
            routes: RoutesConfig::default(),
        };
        let router = Router::new()
            .route(
                "/",
                get(|request: Request| async move {
                    if request.extensions().get::<RequestStart>().is_some() {
                        StatusCode::OK
                    } else {
                        StatusCode::PRECONDITION_FAILED
                    }
                }),
            )
            .layer(middleware::from_fn_with_state(state.clone(), track_request))
            .with_state(state);

        let response = router
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_after_records_elapsed() {
        let sink = Samples::default();
        let start = RequestStart(Instant::now() - Duration::from_millis(50));
        let labels = RequestLabels {
            path: "/slow".into(),
            method: "GET".into(),
            status: 200,
        };

        let elapsed = after(&sink, &labels, start);

        let samples = sink.0.lock().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].0, labels);
        assert!(samples[0].1 >= Duration::from_millis(50));
        assert!(elapsed >= Duration::from_millis(50));
    }
}
