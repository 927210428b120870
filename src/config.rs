//! Configuration management for chatrelay
//!
//! Parses TOML configuration files and provides typed access to settings.
//! The upstream API credential is never stored in the file; the config only
//! names the environment variable it is read from.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Upstream completion API configuration
///
/// Fields are private to prevent post-validation mutation. Configuration is
/// loaded via deserialization and checked by `Config::validate()`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL of the OpenAI-compatible API (no trailing slash)
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Fixed model identifier sent with every completion request
    #[serde(default = "default_model")]
    model: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl UpstreamConfig {
    /// Get the upstream base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the name of the environment variable holding the API key
    pub fn api_key_env(&self) -> &str {
        &self.api_key_env
    }
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self = toml::from_str(&content).map_err(|source| AppError::ConfigParse {
            path: path_display.clone(),
            source,
        })?;

        // Phase 3: Validate parsed config
        config.validate().map_err(|e| {
            AppError::Config(format!("Invalid config file {}: {}", path_display, e))
        })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()`, but can also be called
    /// explicitly when constructing Config via other means (e.g., in tests).
    pub fn validate(&self) -> AppResult<()> {
        if self.upstream.base_url.trim().is_empty() {
            return Err(AppError::Config(
                "upstream.base_url must not be empty".to_string(),
            ));
        }
        if !self.upstream.base_url.starts_with("http://")
            && !self.upstream.base_url.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "upstream.base_url must start with http:// or https://, got '{}'",
                self.upstream.base_url
            )));
        }
        if self.upstream.base_url.ends_with('/') {
            return Err(AppError::Config(format!(
                "upstream.base_url must not end with a trailing slash, got '{}'",
                self.upstream.base_url
            )));
        }
        if self.upstream.model.trim().is_empty() {
            return Err(AppError::Config(
                "upstream.model must not be empty".to_string(),
            ));
        }
        if self.upstream.api_key_env.trim().is_empty() {
            return Err(AppError::Config(
                "upstream.api_key_env must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Read the upstream API key from the environment
    ///
    /// The key is resolved once at startup and injected into the client;
    /// it never appears in the config file or in source.
    pub fn api_key(&self) -> AppResult<String> {
        match std::env::var(&self.upstream.api_key_env) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(AppError::Config(format!(
                "environment variable {} must be set to the upstream API key",
                self.upstream.api_key_env
            ))),
        }
    }
}
