//! Concurrent health probing across all registered services

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::HealthConfig;
use crate::error::{GatewayError, Result};
use crate::gateway::registry::ServiceRegistry;

/// Overall health verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Healthy,
    Unhealthy,
    Error,
}

/// Aggregated liveness report, recomputed fully on every request
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: Verdict,
    pub timestamp: String,
    pub services: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    /// Report for a fault in the aggregation machinery itself, distinct from
    /// any individual service being down.
    pub fn aggregation_failure(message: String) -> Self {
        Self {
            status: Verdict::Error,
            timestamp: now(),
            services: BTreeMap::new(),
            error: Some(message),
        }
    }
}

/// Probes every registered service and combines the results.
pub struct HealthAggregator {
    registry: Arc<ServiceRegistry>,
    client: Client,
    probe_path: String,
}

impl HealthAggregator {
    /// Create an aggregator with a dedicated probe client bound to the probe timeout.
    pub fn new(registry: Arc<ServiceRegistry>, config: &HealthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            registry,
            client,
            probe_path: config.path.clone(),
        })
    }

    /// Probe all services concurrently; total latency is bounded by the
    /// slowest single probe, never the sum.
    pub async fn check_all(&self) -> Result<HealthReport> {
        let mut probes = Vec::with_capacity(self.registry.len());

        for entry in self.registry.entries() {
            let client = self.client.clone();
            let name = entry.name.clone();
            let url = format!("{}{}", entry.base_url, self.probe_path);

            probes.push(tokio::spawn(async move {
                let healthy = probe(&client, &name, &url).await;
                (name, healthy)
            }));
        }

        let mut services = BTreeMap::new();
        for joined in join_all(probes).await {
            let (name, healthy) =
                joined.map_err(|err| GatewayError::Aggregation(err.to_string()))?;
            services.insert(name, healthy);
        }

        let status = if services.values().all(|healthy| *healthy) {
            Verdict::Healthy
        } else {
            Verdict::Unhealthy
        };

        Ok(HealthReport {
            status,
            timestamp: now(),
            services,
            error: None,
        })
    }
}

/// One probe result is `true` iff the response status is exactly 200;
/// failures and timeouts are absorbed here, never propagated.
async fn probe(client: &Client, service: &str, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(response) => {
            let healthy = response.status().as_u16() == 200;
            debug!(
                service = %service,
                status = %response.status(),
                healthy,
                "health probe completed"
            );
            healthy
        }
        Err(err) => {
            debug!(service = %service, error = %err, "health probe failed");
            false
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
