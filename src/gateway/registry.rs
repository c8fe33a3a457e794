//! Read-only registry of downstream services

use serde::Serialize;

use crate::config::ServiceConfig;
use crate::error::{GatewayError, Result};

/// A named downstream service and where to reach it
#[derive(Debug, Clone, Serialize)]
pub struct ServiceEntry {
    pub name: String,
    pub base_url: String,
}

/// Immutable name -> base URL table, built once at startup.
///
/// Construction is the sole write point; lookups are case-sensitive and the
/// entry order from configuration is preserved for introspection.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    entries: Vec<ServiceEntry>,
}

impl ServiceRegistry {
    /// Build the registry from validated service configuration.
    pub fn from_config(services: &[ServiceConfig]) -> Result<Self> {
        let mut entries: Vec<ServiceEntry> = Vec::with_capacity(services.len());

        for service in services {
            if entries.iter().any(|entry| entry.name == service.name) {
                return Err(GatewayError::Config(config::ConfigError::Message(
                    format!("Duplicate service name '{}'", service.name),
                )));
            }
            entries.push(ServiceEntry {
                name: service.name.clone(),
                // Trailing slashes would double up against the forwarded path.
                base_url: service.base_url.trim_end_matches('/').to_string(),
            });
        }

        Ok(Self { entries })
    }

    /// Resolve a service name to its base URL.
    pub fn lookup(&self, name: &str) -> Result<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.base_url.as_str())
            .ok_or_else(|| GatewayError::ServiceNotFound {
                service: name.to_string(),
            })
    }

    /// All registered services, in configuration order.
    pub fn entries(&self) -> &[ServiceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
