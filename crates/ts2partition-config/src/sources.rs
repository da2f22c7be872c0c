// Configuration source loading.
//
// Priority order:
// 1. Environment variables (TS2PARTITION_* prefix)
// 2. Config file path from TS2PARTITION_CONFIG
// 3. Inline config content from TS2PARTITION_CONFIG_CONTENT
// 4. Default config files (./ts2partition.toml, ./.ts2partition.toml)
// 5. Built-in defaults

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::RuntimeConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["./ts2partition.toml", "./.ts2partition.toml"];

/// Load configuration using native environment/file access.
pub fn load_config() -> Result<RuntimeConfig> {
    let mut config = load_from_file()?.unwrap_or_default();

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<RuntimeConfig>> {
    if let Ok(path) = env::var(format!("{}CONFIG", ENV_PREFIX)) {
        return read_config_file(Path::new(&path)).map(Some);
    }

    if let Ok(content) = env::var(format!("{}CONFIG_CONTENT", ENV_PREFIX)) {
        let config: RuntimeConfig = toml::from_str(&content)
            .context("Failed to parse inline config from TS2PARTITION_CONFIG_CONTENT")?;
        return Ok(Some(config));
    }

    for path in DEFAULT_CONFIG_PATHS {
        let path = Path::new(path);
        if path.exists() {
            return read_config_file(path).map(Some);
        }
    }

    Ok(None)
}

fn read_config_file(path: &Path) -> Result<RuntimeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: RuntimeConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Load configuration from a specific file path (for CLI --config flag).
/// Returns error if file doesn't exist or can't be parsed.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let config = read_from_file_path(path)?;
    config.validate()?;
    Ok(config)
}

/// Same as `load_from_file_path` but leaves validation to the caller, so
/// later overrides can replace invalid values first.
pub fn read_from_file_path(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let mut config = read_config_file(path.as_ref())?;

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    Ok(config)
}

/// Load configuration with graceful fallback to defaults.
/// Unreadable default-location files are ignored rather than fatal.
pub fn load_or_default() -> Result<RuntimeConfig> {
    let config = read_or_default()?;
    config.validate()?;
    Ok(config)
}

/// Same as `load_or_default` without validation.
pub fn read_or_default() -> Result<RuntimeConfig> {
    let mut config = match load_from_file() {
        Ok(Some(file_config)) => file_config,
        Ok(None) => RuntimeConfig::default(),
        Err(e) => {
            debug!(error = %e, "ignoring unreadable config file");
            RuntimeConfig::default()
        }
    };

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    Ok(config)
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}
