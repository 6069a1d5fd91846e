//! Configuration loading and validation for meldgate.
//!
//! Loads `meldgate.toml` from the working directory (path overridable via
//! `MELDGATE_CONFIG`) with environment variable overrides. Validates all
//! settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `meldgate.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which backend `/search` uses: "soap", "bridge", or "none"
    /// (compose-only).
    #[serde(default = "default_backend")]
    pub backend: String,

    /// HTTP listener configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// SOAP endpoint configuration
    #[serde(default)]
    pub soap: SoapConfig,

    /// External engine (subprocess bridge) configuration
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_backend() -> String {
    "soap".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoapConfig {
    /// Registry endpoint URL. `None` uses the built-in integration
    /// endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for SoapConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root of the JVM installation; `bin/java` is resolved underneath.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_home: Option<PathBuf>,

    /// Classpath entries handed to the engine.
    #[serde(default)]
    pub classpath: Vec<PathBuf>,

    /// Fully-qualified main class of the engine trigger.
    #[serde(default)]
    pub main_class: String,

    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

fn default_engine_timeout() -> u64 {
    60
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            java_home: None,
            classpath: vec![],
            main_class: String::new(),
            timeout_secs: default_engine_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path, honoring environment
    /// variable overrides:
    /// - `MELDGATE_CONFIG` (config file path)
    /// - `MELDGATE_BACKEND` (backend selector)
    /// - `MELDGATE_ENDPOINT` (SOAP endpoint URL)
    /// - `MELDGATE_PORT` (gateway port)
    /// - `MELDGATE_JAVA_HOME` (JVM installation root)
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MELDGATE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("meldgate.toml"));
        let mut config = Self::load_from(&path)?;

        if let Ok(backend) = std::env::var("MELDGATE_BACKEND") {
            config.backend = backend;
        }
        if let Ok(endpoint) = std::env::var("MELDGATE_ENDPOINT") {
            config.soap.endpoint = Some(endpoint);
        }
        if let Ok(port) = std::env::var("MELDGATE_PORT") {
            config.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("MELDGATE_PORT is not a port number: {port}"))
            })?;
        }
        if let Ok(java_home) = std::env::var("MELDGATE_JAVA_HOME") {
            config.engine.java_home = Some(PathBuf::from(java_home));
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.backend.as_str() {
            "soap" | "none" => {}
            "bridge" => {
                if self.engine.main_class.is_empty() {
                    return Err(ConfigError::ValidationError(
                        "backend 'bridge' requires engine.main_class".into(),
                    ));
                }
                if self.engine.classpath.is_empty() {
                    return Err(ConfigError::ValidationError(
                        "backend 'bridge' requires engine.classpath entries".into(),
                    ));
                }
            }
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown backend '{other}' (expected soap, bridge, or none)"
                )));
            }
        }

        if self.soap.connect_timeout_secs == 0 || self.engine.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            gateway: GatewayConfig::default(),
            soap: SoapConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
