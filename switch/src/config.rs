//! Settings file management

use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;

use crate::errors::SwitchError;
use crate::logs::LogLevel;

/// Service settings
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// SIM provider configuration
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Directory cache configuration
    #[serde(default)]
    pub cache: CacheSettings,

    /// Diagnostic run configuration
    #[serde(default)]
    pub diag: DiagSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            server: ServerSettings::default(),
            provider: ProviderSettings::default(),
            cache: CacheSettings::default(),
            diag: DiagSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SwitchError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SwitchError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let settings = serde_json::from_str(&raw)
            .map_err(|e| SwitchError::ConfigError(format!("{}: {}", path.display(), e)))?;
        Ok(settings)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// SIM provider settings
#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the provider API
    #[serde(default)]
    pub base_url: String,

    /// Account identifier used as the basic auth username
    #[serde(default)]
    pub account_sid: String,

    /// API token used as the basic auth password
    #[serde(default = "default_auth_token")]
    pub auth_token: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size requested from the listing endpoint
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_auth_token() -> SecretString {
    SecretString::from(String::new())
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    200
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            account_sid: String::new(),
            auth_token: default_auth_token(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

/// Directory cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Seconds a fetched SIM listing stays fresh
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    300
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Diagnostic run settings
#[derive(Debug, Clone, Deserialize)]
pub struct DiagSettings {
    /// Path to the device fleet export
    #[serde(default = "default_device_file")]
    pub device_file: String,

    /// Path to the model catalog
    #[serde(default = "default_model_file")]
    pub model_file: String,

    /// Path to the carrier catalog
    #[serde(default = "default_carrier_file")]
    pub carrier_file: String,

    /// Management console link template, `{serial}` is substituted
    #[serde(default)]
    pub console_link_template: Option<String>,
}

fn default_device_file() -> String {
    "device.json".to_string()
}

fn default_model_file() -> String {
    "model.json".to_string()
}

fn default_carrier_file() -> String {
    "carrier.json".to_string()
}

impl Default for DiagSettings {
    fn default() -> Self {
        Self {
            device_file: default_device_file(),
            model_file: default_model_file(),
            carrier_file: default_carrier_file(),
            console_link_template: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gets_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.provider.timeout_secs, 30);
        assert_eq!(settings.provider.page_size, 200);
        assert_eq!(settings.cache.ttl_secs, 300);
        assert_eq!(settings.diag.device_file, "device.json");
    }

    #[test]
    fn test_full_settings_parse() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "log_level": "debug",
                "server": {"host": "0.0.0.0", "port": 9090},
                "provider": {
                    "base_url": "https://sims.example.com/v1",
                    "account_sid": "AC123",
                    "auth_token": "hunter2",
                    "page_size": 50
                },
                "cache": {"ttl_secs": 60},
                "diag": {"console_link_template": "https://console.example.com/{serial}"}
            }"#,
        )
        .unwrap();

        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.provider.account_sid, "AC123");
        assert_eq!(settings.provider.page_size, 50);
        assert_eq!(settings.cache.ttl_secs, 60);
        assert!(settings.diag.console_link_template.is_some());
    }

    #[test]
    fn test_auth_token_is_redacted_in_debug() {
        let settings: Settings =
            serde_json::from_str(r#"{"provider": {"auth_token": "hunter2"}}"#).unwrap();
        let printed = format!("{:?}", settings.provider);
        assert!(!printed.contains("hunter2"));
    }
}
