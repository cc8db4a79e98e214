//! Startup refuses to proceed with incomplete telemetry configuration.

use std::collections::HashMap;

use telemetry_demo::config::loader::{
    ENV_ACCESS_TOKEN, ENV_BIND_ADDRESS, ENV_OTLP_ENDPOINT, ENV_RESOURCE_ATTRIBUTES,
    ENV_SERVICE_NAME,
};
use telemetry_demo::config::{load_config, ConfigError, Profile, ValidationError};

fn full_env() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        (ENV_SERVICE_NAME, "flask-signoz-demo"),
        (ENV_RESOURCE_ATTRIBUTES, "deployment.environment=development"),
        (ENV_OTLP_ENDPOINT, "http://localhost:4318"),
        (ENV_ACCESS_TOKEN, "token"),
    ])
}

#[test]
fn test_complete_environment_loads() {
    let env = full_env();
    let config = load_config(None, |k| env.get(k).map(|v| v.to_string())).unwrap();

    assert_eq!(config.profile, Profile::Development);
    assert_eq!(config.telemetry.environment().as_deref(), Some("development"));
    assert_eq!(config.listener.bind_address, "127.0.0.1:5000");
}

#[test]
fn test_missing_values_are_all_reported() {
    let mut env = full_env();
    env.remove(ENV_OTLP_ENDPOINT);
    env.remove(ENV_ACCESS_TOKEN);

    let err = load_config(None, |k| env.get(k).map(|v| v.to_string())).unwrap_err();
    match err {
        ConfigError::Validation(errors) => assert_eq!(
            errors,
            vec![
                ValidationError::Missing(ENV_OTLP_ENDPOINT),
                ValidationError::Missing(ENV_ACCESS_TOKEN),
            ]
        ),
        other => panic!("unexpected error {}", other),
    }
}

#[tokio::test]
async fn test_startup_fails_before_binding() {
    use telemetry_demo::lifecycle::startup::{self, StartupError};

    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let bind_address = format!("127.0.0.1:{}", port);

    // Only the bind address is set; every required value is missing.
    let result = startup::run_with_lookup(|k| {
        (k == ENV_BIND_ADDRESS).then(|| bind_address.clone())
    })
    .await;

    match result {
        Err(StartupError::Config(ConfigError::Validation(errors))) => {
            assert_eq!(errors.len(), 4);
            assert!(errors.iter().all(|e| matches!(e, ValidationError::Missing(_))));
        }
        Err(other) => panic!("unexpected error {}", other),
        Ok(()) => panic!("startup succeeded without configuration"),
    }

    // Nothing was left listening on the configured port.
    std::net::TcpListener::bind(&bind_address).unwrap();
}
