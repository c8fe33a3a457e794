//! HTTP boundary handlers
//!
//! The only layer that serializes errors to clients and sets HTTP status
//! codes from the normalized error shape.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::ProxyError;
use crate::gateway::forwarder::ProxyRequest;
use crate::gateway::health::{HealthReport, Verdict};
use crate::gateway::path::resolve_path;
use crate::AppState;

type SharedState = State<Arc<AppState>>;

/// Introspection payload for the `/services` endpoint
#[derive(Serialize)]
struct ServicesResponse {
    services: BTreeMap<String, String>,
    count: usize,
    timestamp: String,
}

pub async fn health(State(state): SharedState) -> Response {
    match state.health.check_all().await {
        Ok(report) => {
            let status = if report.status == Verdict::Healthy {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            (status, Json(report)).into_response()
        }
        Err(err) => {
            warn!(error = %err, "health aggregation failed");
            let report = HealthReport::aggregation_failure(err.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(report)).into_response()
        }
    }
}

pub async fn services(State(state): SharedState) -> Response {
    let services: BTreeMap<String, String> = state
        .registry
        .entries()
        .iter()
        .map(|entry| (entry.name.clone(), entry.base_url.clone()))
        .collect();

    let response = ServicesResponse {
        count: services.len(),
        services,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    (StatusCode::OK, Json(response)).into_response()
}

pub async fn proxy_root(
    State(state): SharedState,
    Path(service): Path<String>,
    uri: Uri,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward_resolved(&state, &service, &uri, method, &headers, body).await
}

pub async fn proxy_tail(
    State(state): SharedState,
    Path((service, _tail)): Path<(String, String)>,
    uri: Uri,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward_resolved(&state, &service, &uri, method, &headers, body).await
}

pub async fn ml(
    State(state): SharedState,
    uri: Uri,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward_resolved(&state, "ml", &uri, method, &headers, body).await
}

pub async fn app(
    State(state): SharedState,
    uri: Uri,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward_resolved(&state, "app", &uri, method, &headers, body).await
}

pub async fn auth_register(
    State(state): SharedState,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(&state, "auth", "/register".to_string(), method, &headers, body).await
}

pub async fn auth_login(
    State(state): SharedState,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(&state, "auth", "/login".to_string(), method, &headers, body).await
}

pub async fn auth_profile(
    State(state): SharedState,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(&state, "auth", "/profile".to_string(), method, &headers, body).await
}

pub async fn auth_check(
    State(state): SharedState,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(&state, "auth", "/check".to_string(), method, &headers, body).await
}

async fn forward_resolved(
    state: &AppState,
    service: &str,
    uri: &Uri,
    method: Method,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let inbound = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let path = resolve_path(inbound, service);

    dispatch(state, service, path, method, headers, body).await
}

async fn dispatch(
    state: &AppState,
    service: &str,
    path: String,
    method: Method,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let request = ProxyRequest {
        service: service.to_string(),
        path,
        method,
        body: parse_request_body(&body),
        headers: headers_to_map(headers),
    };

    match state.forwarder.forward(request).await {
        Ok(result) => (StatusCode::OK, Json(result.body)).into_response(),
        Err(failure) => {
            warn!(service = %service, error = %failure, "proxy request failed");
            ProxyError::normalize(failure, service).into_response()
        }
    }
}

fn parse_request_body(bytes: &Bytes) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    Some(
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned())),
    )
}

fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
