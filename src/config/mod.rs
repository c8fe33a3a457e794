//! Configuration module

pub mod settings;

pub use settings::{
    HealthConfig, LoggingConfig, ProxyConfig, ServerConfig, ServiceConfig, Settings,
};
