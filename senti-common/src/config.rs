//! Configuration management for the sentiment service.
//!
//! The service reads a single configuration file at `~/.senti/config.json`, or the
//! file named by `SENTI_CONFIG` when set.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (SENTI_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `SENTI_CONFIG` → path of the config file
//! - `SENTI_BIND_ADDRESS` → network.bind
//! - `SENTI_PORT` → server.port
//! - `SENTI_MAX_UPLOAD_BYTES` → server.max_upload_bytes
//! - `SENTI_LOG_LEVEL` → observability.log_level
//! - `SENTI_LOG_FORMAT` → observability.log_format

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, ResultExt};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".senti"),
        |dirs| dirs.home_dir().join(".senti"),
    )
}

/// Get the configuration file path.
///
/// `SENTI_CONFIG` takes precedence; a leading `~` is expanded.
pub fn config_path() -> PathBuf {
    match std::env::var("SENTI_CONFIG") {
        Ok(raw) if !raw.trim().is_empty() => PathBuf::from(shellexpand::tilde(raw.trim()).as_ref()),
        _ => config_dir().join("config.json"),
    }
}

// ============================================================================
// Network Configuration
// ============================================================================

/// Network configuration.
///
/// Default bind address is `127.0.0.1` (local only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind_address")]
    pub bind: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

// ============================================================================
// Server Configuration
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Allow any origin, method and header
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_permissive: true,
        }
    }
}

fn default_port() -> u16 {
    4460
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

// ============================================================================
// Analysis Configuration
// ============================================================================

/// Settings for the analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// File name offered when the result JSON is downloaded
    #[serde(default = "default_download_file_name")]
    pub download_file_name: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            download_file_name: default_download_file_name(),
        }
    }
}

fn default_download_file_name() -> String {
    "sentiment_results.json".into()
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to set to `warn`.
    ///
    /// Built-in noisy modules (hyper, h2, tower_http, ...) are always filtered.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Where the active configuration was read from.
///
/// Returned by the loaders so the caller can report it once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No file at this path; defaults apply
    Defaults(PathBuf),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// JSON Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<(Self, ConfigSource)> {
        Self::load_or_default(&config_path())
    }

    /// Load configuration from `path`, falling back to defaults when it is absent.
    pub fn load_or_default(path: &Path) -> Result<(Self, ConfigSource)> {
        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults(path.to_path_buf())));
        }

        let config = Self::load_from(path)?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .context(format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration and apply environment variable overrides.
    pub fn load_with_env() -> Result<(Self, ConfigSource)> {
        let (mut config, source) = Self::load()?;
        config.apply_env_overrides()?;
        Ok((config, source))
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// Numeric variables that fail to parse are reported as configuration errors
    /// instead of being silently ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("SENTI_BIND_ADDRESS") {
            self.network.bind = bind;
        }

        if let Some(port) = lookup("SENTI_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("SENTI_PORT is not a valid port: {port}")))?;
        }

        if let Some(limit) = lookup("SENTI_MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = limit.trim().parse().map_err(|_| {
                Error::Config(format!("SENTI_MAX_UPLOAD_BYTES is not a byte count: {limit}"))
            })?;
        }

        if let Some(level) = lookup("SENTI_LOG_LEVEL") {
            self.observability.log_level = level;
        }

        if let Some(format) = lookup("SENTI_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        Ok(())
    }

    /// Get the effective bind address.
    pub fn bind_address(&self) -> &str {
        &self.network.bind
    }

    /// Get the listening port.
    pub fn port(&self) -> u16 {
        self.server.port
    }
}
