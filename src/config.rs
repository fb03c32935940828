//! Service configuration
//!
//! Settings are layered: built-in defaults, then an optional config file, then
//! `SUMMARIZER__SECTION__KEY` environment variables, then the flat variable
//! names used by existing deployments (`PROXY_WORKER_URL`, `PROXY_MASTER_KEY`,
//! `USE_PLACEHOLDER_LLM`).

use crate::pipeline::TokenBudget;
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Top-level settings
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub pipeline: TokenBudget,
    /// JSON file listing the available models
    #[serde(default)]
    pub roster_path: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Completion provider configuration
#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    /// Full URL completion requests are POSTed to
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer credential
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,

    /// Answer every call with a canned placeholder instead of calling the provider
    #[serde(default)]
    pub offline: bool,
}

fn default_provider_timeout() -> u64 {
    180
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_provider_timeout(),
            offline: false,
        }
    }
}

impl ProviderConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Text-extraction service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_extraction_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_extraction_timeout")]
    pub timeout_secs: u64,
}

fn default_extraction_endpoint() -> String {
    "http://localhost:8000/scrape/".to_string()
}

fn default_extraction_timeout() -> u64 {
    90
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_extraction_endpoint(),
            timeout_secs: default_extraction_timeout(),
        }
    }
}

impl ExtractionConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
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
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus `SUMMARIZER__*` variables
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder
            .add_source(
                config::Environment::with_prefix("SUMMARIZER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Apply the flat environment variable names
    pub fn from_env(self) -> Self {
        self.apply_env(|key| std::env::var(key).ok())
    }

    fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PROXY_WORKER_URL") {
            self.provider.base_url = Some(val);
        }

        if let Some(val) = lookup("PROXY_MASTER_KEY") {
            self.provider.api_key = Some(SecretString::new(val));
        }

        if let Some(val) = lookup("USE_PLACEHOLDER_LLM") {
            self.provider.offline = val.to_lowercase() == "true" || val == "1";
        }

        if let Some(val) = lookup("CRAWL_SERVICE_URL") {
            self.extraction.endpoint = val;
        }

        if let Some(val) = lookup("MODEL_ROSTER_PATH") {
            self.roster_path = Some(val);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.provider.timeout_secs, 180);
        assert!(!settings.provider.offline);
        assert_eq!(settings.extraction.timeout(), Duration::from_secs(90));
        assert_eq!(settings.pipeline.token_threshold, 3500);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_flat_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PROXY_WORKER_URL", "https://proxy.example/v1/chat"),
            ("PROXY_MASTER_KEY", "secret-key"),
            ("USE_PLACEHOLDER_LLM", "TRUE"),
        ]
        .into_iter()
        .collect();

        let settings = Settings::default().apply_env(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(
            settings.provider.base_url.as_deref(),
            Some("https://proxy.example/v1/chat")
        );
        assert_eq!(
            settings.provider.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("secret-key")
        );
        assert!(settings.provider.offline);
    }

    #[test]
    fn test_placeholder_flag_parsing() {
        let settings = Settings::default().apply_env(|k| {
            (k == "USE_PLACEHOLDER_LLM").then(|| "no".to_string())
        });
        assert!(!settings.provider.offline);
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let settings = Settings::default().apply_env(|k| {
            (k == "PROXY_MASTER_KEY").then(|| "super-secret".to_string())
        });
        assert!(!format!("{:?}", settings).contains("super-secret"));
    }

    #[test]
    fn test_load_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.pipeline.chunk_target_tokens, 3000);
    }
}
