//! Functional tests for health aggregation

use std::time::{Duration, Instant};

use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{build_app, get, read_json, settings_for};

async fn health_mock(status: u16, delay: Option<Duration>) -> MockServer {
    let server = MockServer::start().await;
    let mut template = ResponseTemplate::new(status).set_body_json(json!({"status": "ok"}));
    if let Some(delay) = delay {
        template = template.set_delay(delay);
    }
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_all_healthy_is_200() {
    let a = health_mock(200, None).await;
    let b = health_mock(200, None).await;

    let app = build_app(settings_for(vec![("auth", a.uri()), ("ml", b.uri())]));
    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["auth"], true);
    assert_eq!(body["services"]["ml"], true);
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_one_failing_service_is_503_unhealthy() {
    let healthy = health_mock(200, None).await;
    let failing = health_mock(503, None).await;

    let app = build_app(settings_for(vec![
        ("auth", healthy.uri()),
        ("ml", failing.uri()),
    ]));
    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), 503);
    let body = read_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["services"]["auth"], true);
    assert_eq!(body["services"]["ml"], false);
}

#[tokio::test]
async fn test_probe_requires_status_exactly_200() {
    let no_content = health_mock(204, None).await;

    let app = build_app(settings_for(vec![("auth", no_content.uri())]));
    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), 503);
    let body = read_json(response).await;
    assert_eq!(body["services"]["auth"], false);
}

#[tokio::test]
async fn test_unreachable_service_is_absorbed_as_false() {
    let healthy = health_mock(200, None).await;

    let app = build_app(settings_for(vec![
        ("auth", healthy.uri()),
        ("ml", "http://127.0.0.1:9".to_string()),
    ]));
    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), 503);
    let body = read_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["services"]["auth"], true);
    assert_eq!(body["services"]["ml"], false);
}

#[tokio::test]
async fn test_probes_fan_out_concurrently() {
    let delay = Duration::from_millis(400);
    let mut services = Vec::new();
    let mut servers = Vec::new();
    for name in ["auth", "ml", "app", "monitoring", "billing"] {
        let server = health_mock(200, Some(delay)).await;
        services.push((name, server.uri()));
        servers.push(server);
    }

    let app = build_app(settings_for(services));

    let start = Instant::now();
    let response = app.oneshot(get("/api/health")).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response.status(), 200);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");

    // Five 400ms probes sequentially would take at least 2s; concurrently
    // the total is bounded by the slowest probe.
    assert!(
        elapsed < Duration::from_millis(1200),
        "probes did not run concurrently: {elapsed:?}"
    );
}

#[tokio::test]
async fn test_slow_probe_times_out_without_delaying_the_rest() {
    let fast = health_mock(200, None).await;
    let slow = health_mock(200, Some(Duration::from_millis(1500))).await;

    let mut settings = settings_for(vec![("auth", fast.uri()), ("ml", slow.uri())]);
    settings.health.timeout_ms = 300;
    let app = build_app(settings);

    let start = Instant::now();
    let response = app.oneshot(get("/api/health")).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response.status(), 503);
    let body = read_json(response).await;
    assert_eq!(body["services"]["auth"], true);
    assert_eq!(body["services"]["ml"], false);
    assert!(
        elapsed < Duration::from_millis(1200),
        "timed-out probe delayed the verdict: {elapsed:?}"
    );
}
