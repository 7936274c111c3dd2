//! Bridge configuration
//!
//! # Responsibilities
//! - TOML schema with defaults for every field
//! - Loading from disk (`load_config`)
//! - Semantic validation that reports every problem at once
//!
//! ```toml
//! [logging]
//! filter = "bridge_methods=debug"
//! format = "json"
//!
//! [console]
//! capacity = 500
//!
//! [tools]
//! disabled = ["console_write"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for the schema
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantic validation failed
    #[error("Validation failed: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Logging setup
    pub logging: LoggingConfig,
    /// In-memory console
    pub console: ConsoleConfig,
    /// Tool registry
    pub tools: ToolsConfig,
}

impl BridgeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With logging configuration
    #[inline]
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// With console capacity
    #[inline]
    #[must_use]
    pub fn with_console_capacity(mut self, capacity: usize) -> Self {
        self.console.capacity = capacity;
        self
    }

    /// With a disabled tool
    #[must_use]
    pub fn with_disabled_tool(mut self, name: impl Into<String>) -> Self {
        self.tools.disabled.push(name.into());
        self
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// With filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// With format
    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// In-memory console configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Maximum retained entries; the oldest are dropped first
    pub capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

/// Tool registry configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Built-in tools left out of the registry
    pub disabled: Vec<String>,
}

/// Load and validate configuration from a TOML file
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Parse and validate configuration from TOML text
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
pub fn parse_config(content: &str) -> Result<BridgeConfig, ConfigError> {
    let config: BridgeConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

/// Semantic validation; returns all problems, not just the first
///
/// # Errors
///
/// Returns the list of problems found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.logging.filter.trim().is_empty() {
        errors.push("logging.filter must not be empty".to_string());
    }
    if config.console.capacity == 0 {
        errors.push("console.capacity must be greater than 0".to_string());
    }

    let mut seen = HashSet::new();
    for name in &config.tools.disabled {
        if name.trim().is_empty() {
            errors.push("tools.disabled contains an empty name".to_string());
        } else if !seen.insert(name.as_str()) {
            errors.push(format!("tools.disabled lists '{name}' more than once"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
