// ts2partition-config - Runtime configuration for timestamp partitioning tools
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from TS2PARTITION_CONFIG env var
// 3. Config file contents from TS2PARTITION_CONFIG_CONTENT env var
// 4. Default config file locations (./ts2partition.toml, ./.ts2partition.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use ts2partition_core::{PrimitiveType, TimestampTransform};

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};

/// Main runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub transform: TransformConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

/// Partition transform configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default = "default_source_type")]
    pub source_type: PrimitiveType,

    /// year, month, day or hour
    #[serde(default = "default_granularity")]
    pub granularity: String,

    /// Fixed UTC offset id such as `+05:00`; UTC when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,

    /// Partition field name; defaults to the granularity name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_field: Option<String>,
}

fn default_source_type() -> PrimitiveType {
    PrimitiveType::Timestamp
}

fn default_granularity() -> String {
    "day".to_string()
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            source_type: default_source_type(),
            granularity: default_granularity(),
            offset: None,
            partition_field: None,
        }
    }
}

impl TransformConfig {
    /// Build the configured transform
    pub fn build(&self) -> Result<TimestampTransform> {
        TimestampTransform::get(self.source_type, &self.granularity, self.offset.as_deref())
            .with_context(|| {
                format!(
                    "Failed to build '{}' transform for {} column",
                    self.granularity, self.source_type
                )
            })
    }

    pub fn partition_field_name(&self) -> String {
        self.partition_field
            .clone()
            .unwrap_or_else(|| self.granularity.to_lowercase())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load from an explicit file (CLI --config flag), then apply env overrides
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Load configuration, falling back to defaults when no file is found
    pub fn load_or_default() -> Result<Self> {
        sources::load_or_default()
    }

    /// Like `load_from_path`, but unvalidated; call `validate` after applying
    /// any further overrides
    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::read_from_file_path(path)
    }

    /// Like `load_or_default`, but unvalidated
    pub fn read_or_default() -> Result<Self> {
        sources::read_or_default()
    }

    /// Parse configuration from TOML text without consulting the environment
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
