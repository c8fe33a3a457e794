//! Request-Routing API Gateway
//!
//! A front door that maps inbound paths to named downstream services,
//! forwards calls with bounded timeouts, normalizes failures into one
//! canonical error shape, and aggregates per-service liveness into a
//! single health verdict.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;

pub use error::{GatewayError, Result};

use std::sync::Arc;

use gateway::forwarder::Forwarder;
use gateway::health::HealthAggregator;
use gateway::registry::ServiceRegistry;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: config::Settings,
    pub registry: Arc<ServiceRegistry>,
    pub forwarder: Forwarder,
    pub health: HealthAggregator,
}

impl AppState {
    /// Wire the registry, forwarder, and health aggregator from settings.
    pub fn from_settings(settings: config::Settings) -> Result<Self> {
        let registry = Arc::new(ServiceRegistry::from_config(&settings.services)?);
        let forwarder = Forwarder::new(registry.clone(), &settings.proxy)?;
        let health = HealthAggregator::new(registry.clone(), &settings.health)?;

        Ok(Self {
            settings,
            registry,
            forwarder,
            health,
        })
    }
}
