//! Downstream request forwarding

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::ProxyConfig;
use crate::error::{GatewayError, Result};
use crate::gateway::registry::ServiceRegistry;

/// One inbound call, detached from transport framework types.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub service: String,
    /// Path to use against the downstream base URL; starts with `/`.
    pub path: String,
    pub method: Method,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
}

/// Successful downstream response
#[derive(Debug, Clone)]
pub struct ProxyResult {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

/// Executes single, timeout-bounded downstream calls.
pub struct Forwarder {
    registry: Arc<ServiceRegistry>,
    client: Client,
    timeout_ms: u64,
}

impl Forwarder {
    /// Create a forwarder with a shared HTTP client bound to the configured timeout.
    pub fn new(registry: Arc<ServiceRegistry>, config: &ProxyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            registry,
            client,
            timeout_ms: config.timeout_ms,
        })
    }

    /// Forward one request downstream; exactly one call, no retry.
    pub async fn forward(&self, request: ProxyRequest) -> Result<ProxyResult> {
        let base_url = self.registry.lookup(&request.service)?;
        let url = format!("{}{}", base_url, request.path);

        debug!(
            service = %request.service,
            method = %request.method,
            url = %url,
            "forwarding request"
        );

        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|_| GatewayError::Internal(format!("Unsupported method {}", request.method)))?;

        let mut builder = self.client.request(method, &url);
        for (name, value) in sanitize_headers(&request.headers) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if accepts_body(&request.method) {
            if let Some(body) = &request.body {
                builder = builder.body(serde_json::to_vec(body)?);
            }
        }

        let response = builder.send().await.map_err(|err| self.classify(err))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response.bytes().await.map_err(|err| self.classify(err))?;
        let body = parse_body(&bytes);

        if (200..300).contains(&status) {
            Ok(ProxyResult {
                status,
                headers,
                body,
            })
        } else {
            Err(GatewayError::Downstream { status, body })
        }
    }

    fn classify(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            GatewayError::Network {
                message: err.to_string(),
            }
        }
    }
}

/// Drops connection-management headers and guarantees a JSON content type.
///
/// `host` and `connection` must not cross to a new connection against a
/// different origin; everything else, authorization included, passes through.
pub fn sanitize_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    let mut sanitized: HashMap<String, String> = headers
        .iter()
        .filter(|(name, _)| {
            !name.eq_ignore_ascii_case("host") && !name.eq_ignore_ascii_case("connection")
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    if !sanitized
        .keys()
        .any(|name| name.eq_ignore_ascii_case("content-type"))
    {
        sanitized.insert("content-type".to_string(), "application/json".to_string());
    }

    sanitized
}

/// GET and DELETE carry no conventional body and never forward one.
fn accepts_body(method: &Method) -> bool {
    *method != Method::GET && *method != Method::DELETE && *method != Method::HEAD
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
