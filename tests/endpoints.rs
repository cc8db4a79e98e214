//! End-to-end behaviour of the demo endpoints over a real socket.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn test_static_endpoints() {
    let metrics = Arc::new(common::CapturingMetrics::default());
    let (addr, shutdown) = common::spawn_server(common::test_config(), metrics.clone()).await;
    let client = common::client();

    let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Welcome to the Flask SigNoz Demo!" }));

    let res = client.get(format!("http://{}/fast", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "This is a fast response!" }));

    assert_eq!(metrics.home_visits(), 1);
    shutdown.trigger();
}

#[tokio::test]
async fn test_fast_has_no_artificial_delay() {
    let metrics = Arc::new(common::CapturingMetrics::default());
    let (addr, shutdown) = common::spawn_server(common::test_config(), metrics).await;
    let client = common::client();

    for path in ["/", "/fast"] {
        let start = Instant::now();
        let res = client.get(format!("http://{}{}", addr, path)).send().await.unwrap();
        assert_eq!(res.status(), 200);
        assert!(
            start.elapsed() < Duration::from_millis(250),
            "{} took {:?}",
            path,
            start.elapsed()
        );
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_waits_for_configured_delay() {
    let metrics = Arc::new(common::CapturingMetrics::default());
    let (addr, shutdown) = common::spawn_server(common::test_config(), metrics.clone()).await;

    let start = Instant::now();
    let res = common::client()
        .get(format!("http://{}/slow", addr))
        .send()
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "This is a slow response!" }));
    assert!(elapsed >= Duration::from_millis(300), "returned after {:?}", elapsed);

    let recorded = metrics.requests();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].1 >= Duration::from_millis(300));

    shutdown.trigger();
}

#[tokio::test]
async fn test_error_endpoint_only_returns_fixed_payloads() {
    let metrics = Arc::new(common::CapturingMetrics::default());
    let (addr, shutdown) = common::spawn_server(common::test_config(), metrics).await;
    let client = common::client();

    for _ in 0..40 {
        let res = client.get(format!("http://{}/error", addr)).send().await.unwrap();
        let status = res.status().as_u16();
        let body: serde_json::Value = res.json().await.unwrap();
        match status {
            200 => assert_eq!(body, json!({ "message": "No error this time!" })),
            500 => assert_eq!(body, json!({ "error": "An internal error occurred" })),
            other => panic!("unexpected status {}", other),
        }
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_header() {
    let metrics = Arc::new(common::CapturingMetrics::default());
    let (addr, shutdown) = common::spawn_server(common::test_config(), metrics).await;
    let client = common::client();

    let res = client.get(format!("http://{}/fast", addr)).send().await.unwrap();
    let generated = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(generated).is_ok());

    let res = client
        .get(format!("http://{}/fast", addr))
        .header("x-request-id", "client-chosen")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "client-chosen"
    );

    shutdown.trigger();
}
