//! Common error types and the canonical client-facing error contract

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service not found")]
    ServiceNotFound { service: String },

    #[error("request failed with status code {status}")]
    Downstream { status: u16, body: Value },

    #[error("{message}")]
    Network { message: String },

    #[error("timeout of {timeout_ms}ms exceeded")]
    Timeout { timeout_ms: u64 },

    #[error("health aggregation failed: {0}")]
    Aggregation(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, GatewayError>;

/// The uniform error shape returned to gateway clients.
///
/// Only [`ProxyError::normalize`] constructs this; handlers serialize it and
/// take the HTTP status from `status_code`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyError {
    pub status_code: u16,
    pub message: String,
    pub service: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ProxyError {
    /// Maps any forwarding failure into the canonical error shape.
    pub fn normalize(failure: GatewayError, service: &str) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        match failure {
            GatewayError::Downstream { status, body } => {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("request failed with status code {status}"));
                let details = if body.is_null() { None } else { Some(body) };

                Self {
                    status_code: status,
                    message,
                    service: service.to_owned(),
                    timestamp,
                    details,
                }
            }
            GatewayError::ServiceNotFound { .. } => Self {
                status_code: 500,
                message: "Service not found".to_owned(),
                service: service.to_owned(),
                timestamp,
                details: None,
            },
            other => {
                let message = other.to_string();
                let message = if message.is_empty() {
                    "Internal Server Error".to_owned()
                } else {
                    message
                };

                Self {
                    status_code: 500,
                    message,
                    service: service.to_owned(),
                    timestamp,
                    details: None,
                }
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
