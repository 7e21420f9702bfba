//! Configuration management for modelgate
//!
//! Settings come from an optional TOML file, then environment variables
//! (`OPENROUTER_API_KEY`, `OPENROUTER_URL`, `PORT`) override individual fields.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default upstream chat completions endpoint
pub const DEFAULT_UPSTREAM_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Environment variable holding the upstream bearer token
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the upstream URL
pub const ENV_UPSTREAM_URL: &str = "OPENROUTER_URL";
/// Environment variable overriding the listen port
pub const ENV_PORT: &str = "PORT";

const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
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
    5000
}

/// Location of the persisted model registry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("api_config.json")
}

/// Upstream chat completion API settings
#[derive(Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    pub url: String,
    /// Bearer token; usually supplied through `OPENROUTER_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sent as `HTTP-Referer` when the caller provides no `Referer` header
    #[serde(default = "default_referer")]
    pub referer: String,
    /// Sent as `X-Title`
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
    #[serde(default = "default_completion_timeout")]
    pub completion_timeout_seconds: u64,
}

impl UpstreamConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_seconds)
    }

    /// The API key, treating an empty string as unset
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            api_key: None,
            referer: default_referer(),
            title: default_title(),
            probe_timeout_seconds: default_probe_timeout(),
            completion_timeout_seconds: default_completion_timeout(),
        }
    }
}

// Keeps the key out of logs
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("referer", &self.referer)
            .field("title", &self.title)
            .field("probe_timeout_seconds", &self.probe_timeout_seconds)
            .field(
                "completion_timeout_seconds",
                &self.completion_timeout_seconds,
            )
            .finish()
    }
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_referer() -> String {
    "http://localhost:5000".to_string()
}

fn default_title() -> String {
    "modelgate".to_string()
}

fn default_probe_timeout() -> u64 {
    20
}

fn default_completion_timeout() -> u64 {
    30
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

        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        let config: Self = toml::from_str(&content).map_err(|source| {
            AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::info!(
                path = %path.as_ref().display(),
                "Config file not found, using defaults"
            );
            Ok(Self::default())
        }
    }

    /// Apply environment overrides from the process environment
    pub fn apply_env(&mut self) -> AppResult<()> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply environment overrides from an arbitrary lookup
    ///
    /// Split out from `apply_env` so tests never touch the process environment.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|key| !key.is_empty()) {
            self.upstream.api_key = Some(key);
        }

        if let Some(url) = lookup(ENV_UPSTREAM_URL).filter(|url| !url.is_empty()) {
            self.upstream.url = url;
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| {
                AppError::Config(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?;
        }

        self.validate()
    }

    /// Validate configuration after parsing
    pub fn validate(&self) -> AppResult<()> {
        let url = &self.upstream.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "upstream.url must start with http:// or https://, got '{}'",
                url
            )));
        }

        for (name, value) in [
            ("probe_timeout_seconds", self.upstream.probe_timeout_seconds),
            (
                "completion_timeout_seconds",
                self.upstream.completion_timeout_seconds,
            ),
        ] {
            if value == 0 || value > MAX_TIMEOUT_SECONDS {
                return Err(AppError::Config(format!(
                    "upstream.{} must be in (0, {}], got {}",
                    name, MAX_TIMEOUT_SECONDS, value
                )));
            }
        }

        if self.registry.path.as_os_str().is_empty() {
            return Err(AppError::Config(
                "registry.path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
