// Configuration validation
//
// Validates that transform settings name a buildable transform and logging
// values are usable

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;
use ts2partition_core::{Granularity, PrimitiveType, ZoneOffset};

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_transform_config(&config.transform)?;
    validate_log_config(&config.logging)?;
    Ok(())
}

fn validate_transform_config(config: &TransformConfig) -> Result<()> {
    if config.source_type != PrimitiveType::Timestamp {
        bail!(
            "transform.source_type must be 'timestamp', got '{}'",
            config.source_type
        );
    }

    if config.granularity.parse::<Granularity>().is_err() {
        bail!(
            "transform.granularity '{}' is not supported. Supported: year, month, day, hour",
            config.granularity
        );
    }

    if let Some(ref offset) = config.offset {
        let parsed = ZoneOffset::parse(offset)
            .map_err(|e| anyhow::anyhow!("transform.offset is invalid: {}", e))?;
        if !parsed.is_utc() {
            warn!(
                offset = %parsed,
                "partition values and human strings use local time at this offset"
            );
        }
    }

    if let Some(ref field) = config.partition_field {
        if field.trim().is_empty() {
            bail!("transform.partition_field must not be empty");
        }
    }

    Ok(())
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("logging.level must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_transform(transform: TransformConfig) -> RuntimeConfig {
        RuntimeConfig {
            transform,
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let config = with_transform(TransformConfig {
            granularity: "MONTH".to_string(),
            offset: Some("+05:30".to_string()),
            ..TransformConfig::default()
        });
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_unknown_granularity() {
        let config = with_transform(TransformConfig {
            granularity: "week".to_string(),
            ..TransformConfig::default()
        });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("transform.granularity"));
    }

    #[test]
    fn test_rejects_bad_offset() {
        let config = with_transform(TransformConfig {
            offset: Some("+19:00".to_string()),
            ..TransformConfig::default()
        });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("transform.offset"));
    }

    #[test]
    fn test_rejects_non_timestamp_source() {
        let config = with_transform(TransformConfig {
            source_type: PrimitiveType::Date,
            ..TransformConfig::default()
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_blank_values() {
        let config = with_transform(TransformConfig {
            partition_field: Some("  ".to_string()),
            ..TransformConfig::default()
        });
        assert!(validate_config(&config).is_err());

        let mut config = RuntimeConfig::default();
        config.logging.level = String::new();
        assert!(validate_config(&config).is_err());
    }
}
