//! Application configuration options

use std::time::Duration;

use crate::config::{ProviderSettings, Settings};

/// Main application options
#[derive(Debug)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Server configuration
    pub server: ServerOptions,

    /// Provider credentials and endpoints
    pub provider: ProviderSettings,

    /// Time a fetched SIM listing stays fresh
    pub cache_ttl: Duration,
}

impl AppOptions {
    /// Build runtime options from loaded settings
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            server: ServerOptions {
                host: settings.server.host,
                port: settings.server.port,
            },
            provider: settings.provider,
            cache_ttl: Duration::from_secs(settings.cache.ttl_secs),
        }
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from_settings(Settings::default())
    }
}

/// Lifecycle options for the service
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
