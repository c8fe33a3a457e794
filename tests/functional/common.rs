//! Shared helpers for functional tests

use api_gateway::config::{
    HealthConfig, LoggingConfig, ProxyConfig, ServerConfig, ServiceConfig, Settings,
};
use api_gateway::{api, AppState};
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use serde_json::Value;

/// Settings with the given services and default timeouts.
pub fn settings_for(services: Vec<(&str, String)>) -> Settings {
    Settings {
        server: ServerConfig::default(),
        logging: LoggingConfig::default(),
        proxy: ProxyConfig::default(),
        health: HealthConfig::default(),
        services: services
            .into_iter()
            .map(|(name, base_url)| ServiceConfig {
                name: name.to_string(),
                base_url,
            })
            .collect(),
    }
}

pub fn build_app(settings: Settings) -> Router {
    let state = AppState::from_settings(settings).expect("state should build");
    api::routes::create_router(state.into())
}

pub fn app_for(services: Vec<(&str, String)>) -> Router {
    build_app(settings_for(services))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
