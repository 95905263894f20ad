//! TOML Configuration File Support
//!
//! Centralized configuration loading for the Conductor, supporting a TOML
//! file at `~/.config/insight-desk/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [service]
//! base_url = "http://localhost:8000"
//! ask_path = "/ask"
//! timeout_secs = 60
//!
//! [conversation]
//! welcome_message = "### Hello\nAsk me anything about churn."
//!
//! [metrics]
//! churn_rate = "15.2%"
//! high_risk_count = "152"
//! last_update = "Just now"
//! pipeline_name = "refresh_insights_dag"
//! pipeline_status = "RUNNING"
//! ```
//!
//! # Environment Variables
//!
//! - `INSIGHT_CONFIG`: path of the config file (read by the CLI)
//! - `INSIGHT_ENDPOINT`: service base URL
//! - `INSIGHT_ASK_PATH`: ask endpoint path
//! - `INSIGHT_TIMEOUT_SECS`: request timeout in seconds

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conductor::ConductorConfig;
use crate::metrics::PipelineStatus;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[service]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceToml {
    /// Base URL of the reasoning service
    pub base_url: Option<String>,
    /// Ask endpoint path
    pub ask_path: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[conversation]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationToml {
    /// Message the log is seeded with
    pub welcome_message: Option<String>,
}

/// `[metrics]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsToml {
    /// Churn rate display value
    pub churn_rate: Option<String>,
    /// High-risk customer count display value
    pub high_risk_count: Option<String>,
    /// Freshness label
    pub last_update: Option<String>,
    /// Insight pipeline name
    pub pipeline_name: Option<String>,
    /// Insight pipeline status
    pub pipeline_status: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightToml {
    /// Service section
    pub service: ServiceToml,
    /// Conversation section
    pub conversation: ConversationToml,
    /// Metrics section
    pub metrics: MetricsToml,
}

// =============================================================================
// Loaded Configuration
// =============================================================================

/// Conductor configuration plus where it came from
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    /// The effective Conductor configuration
    pub conductor: ConductorConfig,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Highest-priority source that contributed a value
    pub source: ConfigSource,
}

impl Default for LoadedConfig {
    fn default() -> Self {
        Self {
            conductor: ConductorConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl LoadedConfig {
    /// Check that the values are usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let service = &self.conductor.service;

        if !(service.base_url.starts_with("http://") || service.base_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(format!(
                "service base_url must start with http:// or https://, got {:?}",
                service.base_url
            )));
        }
        if !service.ask_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "service ask_path must start with '/', got {:?}",
                service.ask_path
            )));
        }
        if service.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "service timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/insight-desk/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("insight-desk").join("config.toml"))
}

/// Load configuration from a specific path, then apply the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    load_with_env(path, |key| std::env::var(key).ok())
}

/// Loading core, with the environment injected
fn load_with_env(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<LoadedConfig, ConfigError> {
    let mut config = LoadedConfig::default();

    if let Some(config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.to_path_buf(),
                    source: e,
                })?;

            let toml_config: InsightToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.to_path_buf());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut LoadedConfig, toml: &InsightToml) {
    let conductor = &mut config.conductor;

    // Service settings
    if let Some(ref url) = toml.service.base_url {
        conductor.service.base_url = url.clone();
    }
    if let Some(ref ask_path) = toml.service.ask_path {
        conductor.service.ask_path = ask_path.clone();
    }
    if let Some(secs) = toml.service.timeout_secs {
        conductor.service.timeout = Duration::from_secs(secs);
    }

    // Conversation settings
    if let Some(ref welcome) = toml.conversation.welcome_message {
        conductor.welcome_message = welcome.clone();
    }

    // Metrics settings
    let metrics = &mut conductor.metrics;
    if let Some(ref v) = toml.metrics.churn_rate {
        metrics.churn_rate = v.clone();
    }
    if let Some(ref v) = toml.metrics.high_risk_count {
        metrics.high_risk_count = v.clone();
    }
    if let Some(ref v) = toml.metrics.last_update {
        metrics.last_update = v.clone();
    }
    if toml.metrics.pipeline_name.is_some() || toml.metrics.pipeline_status.is_some() {
        let current = metrics.pipeline.take().unwrap_or(PipelineStatus {
            name: String::new(),
            status: String::new(),
        });
        metrics.pipeline = Some(PipelineStatus {
            name: toml.metrics.pipeline_name.clone().unwrap_or(current.name),
            status: toml.metrics.pipeline_status.clone().unwrap_or(current.status),
        });
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut LoadedConfig, env: impl Fn(&str) -> Option<String>) {
    let service = &mut config.conductor.service;

    if let Some(url) = env("INSIGHT_ENDPOINT") {
        service.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(ask_path) = env("INSIGHT_ASK_PATH") {
        service.ask_path = ask_path;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("INSIGHT_TIMEOUT_SECS") {
        match timeout.parse::<u64>() {
            Ok(secs) => {
                service.timeout = Duration::from_secs(secs);
                config.source = ConfigSource::Env;
            }
            Err(_) => {
                tracing::warn!(value = %timeout, "Ignoring non-numeric INSIGHT_TIMEOUT_SECS");
            }
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Service base URL override
    pub base_url: Option<String>,
    /// Request timeout override (seconds)
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set timeout override
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut LoadedConfig) {
        if self.base_url.is_some() || self.timeout_secs.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref url) = self.base_url {
            config.conductor.service.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.conductor.service.timeout = Duration::from_secs(secs);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
