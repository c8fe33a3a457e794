//! Application settings and configuration management

use crate::error::{GatewayError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default = "default_services")]
    pub services: Vec<ServiceConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Downstream forwarding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    #[serde(default = "default_proxy_timeout")]
    pub timeout_ms: u64,
}

fn default_proxy_timeout() -> u64 {
    5000
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_proxy_timeout(),
        }
    }
}

/// Health probing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthConfig {
    #[serde(default = "default_probe_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_probe_path")]
    pub path: String,
}

fn default_probe_timeout() -> u64 {
    3000
}

fn default_probe_path() -> String {
    "/health".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout(),
            path: default_probe_path(),
        }
    }
}

/// One downstream service the gateway can route to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    pub base_url: String,
}

fn default_services() -> Vec<ServiceConfig> {
    [
        ("auth", 3000),
        ("ml", 3001),
        ("app", 3002),
        ("monitoring", 3003),
    ]
    .into_iter()
    .map(|(name, port)| ServiceConfig {
        name: name.to_string(),
        base_url: format!("http://localhost:{port}"),
    })
    .collect()
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Load from configuration file
            .add_source(
                File::with_name(path.as_ref().to_str().unwrap_or("config/default"))
                    .required(false),
            )
            // Override with environment variables (prefixed with GATEWAY__)
            .add_source(
                Environment::with_prefix("GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        settings.apply_service_env_overrides();
        Ok(settings)
    }

    /// Overrides each service base URL from `{NAME}_SERVICE_URL` when set,
    /// the convention the deployment environment uses per known service.
    fn apply_service_env_overrides(&mut self) {
        for service in &mut self.services {
            let var = format!("{}_SERVICE_URL", service.name.to_uppercase());
            if let Ok(url) = std::env::var(&var) {
                if !url.is_empty() {
                    service.base_url = url;
                }
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(GatewayError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.proxy.timeout_ms == 0 {
            return Err(GatewayError::Config(config::ConfigError::Message(
                "Proxy timeout cannot be 0".to_string(),
            )));
        }

        if self.health.timeout_ms == 0 {
            return Err(GatewayError::Config(config::ConfigError::Message(
                "Health probe timeout cannot be 0".to_string(),
            )));
        }

        for (idx, service) in self.services.iter().enumerate() {
            if service.name.is_empty() {
                return Err(GatewayError::Config(config::ConfigError::Message(
                    "Service name cannot be empty".to_string(),
                )));
            }
            if service.base_url.is_empty() {
                return Err(GatewayError::Config(config::ConfigError::Message(
                    format!("Service '{}' must have a base URL", service.name),
                )));
            }
            if self.services[..idx].iter().any(|other| other.name == service.name) {
                return Err(GatewayError::Config(config::ConfigError::Message(
                    format!("Duplicate service name '{}'", service.name),
                )));
            }
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            proxy: ProxyConfig::default(),
            health: HealthConfig::default(),
            services: default_services(),
        }
    }
}
