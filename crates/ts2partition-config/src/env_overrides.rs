use crate::{LogFormat, RuntimeConfig};
use anyhow::{Context, Result};
use ts2partition_core::PrimitiveType;

pub const ENV_PREFIX: &str = "TS2PARTITION_";

/// Abstraction over environment-variable lookups so tests and embedders can
/// supply their own source of overrides.
pub trait EnvSource {
    /// Get a variable by its key without the TS2PARTITION_ prefix
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Transform configuration
    if let Some(granularity) = get_env_string(env, "GRANULARITY") {
        config.transform.granularity = granularity;
    }
    if let Some(offset) = get_env_string(env, "OFFSET") {
        // an empty value resets to UTC
        config.transform.offset = if offset.is_empty() {
            None
        } else {
            Some(offset)
        };
    }
    if let Some(field) = get_env_string(env, "PARTITION_FIELD") {
        config.transform.partition_field = Some(field);
    }
    if let Some(source_type) = get_env_string(env, "SOURCE_TYPE") {
        config.transform.source_type = source_type
            .parse::<PrimitiveType>()
            .with_context(|| format!("Invalid {}SOURCE_TYPE value", ENV_PREFIX))?;
    }

    // Logging configuration
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.logging.format = format
            .parse::<LogFormat>()
            .with_context(|| format!("Invalid {}LOG_FORMAT value", ENV_PREFIX))?;
    }

    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).map(|val| val.trim().to_string())
}
