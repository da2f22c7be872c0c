// Command implementations for the ts2partition CLI
//
// Each command takes a built transform plus its arguments and returns the
// lines to print.

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use ts2partition_config::RuntimeConfig;
use ts2partition_core::{
    BoundPredicate, BoundTerm, Datum, PredicateOperator, PrimitiveType, TimestampTransform,
};

/// Source column name used when building predicates from the command line
pub const DEFAULT_SOURCE_COLUMN: &str = "ts";

const NULL: &str = "null";

/// Flags that override the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub granularity: Option<String>,
    pub offset: Option<String>,
    pub partition_field: Option<String>,
    pub log_level: Option<String>,
}

impl CliOverrides {
    pub fn apply_to(&self, config: &mut RuntimeConfig) {
        if let Some(granularity) = &self.granularity {
            config.transform.granularity = granularity.clone();
        }
        if let Some(offset) = &self.offset {
            config.transform.offset = Some(offset.clone());
        }
        if let Some(field) = &self.partition_field {
            config.transform.partition_field = Some(field.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// `apply`: bucket each timestamp and show its partition value
pub fn apply(transform: &TimestampTransform, inputs: &[String]) -> Result<Vec<String>> {
    inputs
        .iter()
        .map(|input| -> Result<String> {
            let micros = parse_optional_i64(input)?;
            let value = transform
                .apply(micros)
                .with_context(|| format!("Failed to transform {}", input))?;
            let human = transform.to_human_string(value)?;
            debug!(input = %input, value = ?value, "applied transform");
            Ok(format!("{} -> {} ({})", input, display_value(value), human))
        })
        .collect()
}

/// `project`: project a predicate on the source column onto the partition field
pub fn project(
    transform: &TimestampTransform,
    partition_field: &str,
    source_column: &str,
    op: &str,
    values: &[i64],
    strict: bool,
) -> Result<String> {
    let op: PredicateOperator = op.parse()?;
    let predicate = build_predicate(source_column, op, values)?;

    let projected = if strict {
        transform.project_strict(partition_field, &predicate)?
    } else {
        transform.project(partition_field, &predicate)?
    };

    info!(
        transform = %transform,
        predicate = %predicate,
        strict,
        projected = projected.is_some(),
        "projected predicate"
    );

    Ok(match projected {
        Some(predicate) => predicate.to_string(),
        None => "no projection".to_string(),
    })
}

/// `describe`: identity, granularity, offset and result type of the transform
pub fn describe(transform: &TimestampTransform, partition_field: &str) -> Vec<String> {
    vec![
        format!("transform:    {}", transform),
        format!("granularity:  {}", transform.granularity()),
        format!("offset:       {}", transform.offset()),
        format!("field:        {}", partition_field),
        format!(
            "result type:  {}",
            transform.result_type(PrimitiveType::Timestamp)
        ),
    ]
}

/// `human`: render partition values the way partition paths show them
pub fn human(transform: &TimestampTransform, inputs: &[String]) -> Result<Vec<String>> {
    inputs
        .iter()
        .map(|input| -> Result<String> {
            let value = parse_optional_i64(input)?
                .map(|v| {
                    i32::try_from(v)
                        .with_context(|| format!("Partition value {} does not fit in i32", v))
                })
                .transpose()?;
            Ok(transform.to_human_string(value)?)
        })
        .collect()
}

fn build_predicate(
    source_column: &str,
    op: PredicateOperator,
    values: &[i64],
) -> Result<BoundPredicate> {
    let term = BoundTerm::reference(source_column, PrimitiveType::Timestamp);
    let predicate = if op.is_unary() {
        if !values.is_empty() {
            bail!("{} takes no --value", op);
        }
        BoundPredicate::unary(op, term)?
    } else if op.is_binary() {
        let [value] = values else {
            bail!("{} takes exactly one --value, got {}", op, values.len());
        };
        BoundPredicate::binary(op, term, Datum::timestamp_micros(*value))?
    } else {
        BoundPredicate::set(
            op,
            term,
            values.iter().copied().map(Datum::timestamp_micros),
        )?
    };
    Ok(predicate)
}

fn parse_optional_i64(input: &str) -> Result<Option<i64>> {
    let input = input.trim();
    if input.eq_ignore_ascii_case(NULL) {
        return Ok(None);
    }
    input
        .parse::<i64>()
        .map(Some)
        .with_context(|| format!("'{}' is not an integer or null", input))
}

fn display_value(value: Option<i32>) -> String {
    value.map_or_else(|| NULL.to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts2partition_core::Granularity;

    // 2021-06-15T10:30:00Z
    const SAMPLE: i64 = 1_623_753_000_000_000;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn apply_prints_value_and_human_string() {
        let day = TimestampTransform::utc(Granularity::Day);
        let lines = apply(&day, &strings(&[&SAMPLE.to_string(), "null"])).unwrap();
        assert_eq!(
            lines,
            vec![
                format!("{} -> 18793 (2021-06-15)", SAMPLE),
                "null -> null (null)".to_string(),
            ]
        );
    }

    #[test]
    fn inputs_are_trimmed_before_parsing() {
        assert_eq!(parse_optional_i64(" 5 ").unwrap(), Some(5));
        assert_eq!(parse_optional_i64(" null").unwrap(), None);
        assert_eq!(parse_optional_i64("NULL ").unwrap(), None);
        assert!(parse_optional_i64(" ").is_err());
    }

    #[test]
    fn apply_rejects_garbage() {
        let day = TimestampTransform::utc(Granularity::Day);
        assert!(apply(&day, &strings(&["yesterday"])).is_err());
    }

    #[test]
    fn project_inclusive_and_strict() {
        let day = TimestampTransform::utc(Granularity::Day);
        let inclusive = project(&day, "ts_day", "ts", "lt", &[SAMPLE], false).unwrap();
        assert_eq!(inclusive, "ts_day <= 2021-06-15");

        let strict = project(&day, "ts_day", "ts", "lt", &[SAMPLE], true).unwrap();
        assert_eq!(strict, "ts_day < 2021-06-15");

        let none = project(&day, "ts_day", "ts", "neq", &[SAMPLE], false).unwrap();
        assert_eq!(none, "no projection");
    }

    #[test]
    fn project_checks_value_count() {
        let month = TimestampTransform::utc(Granularity::Month);
        assert!(project(&month, "m", "ts", "eq", &[], false).is_err());
        assert!(project(&month, "m", "ts", "isnull", &[1], false).is_err());
        assert!(project(&month, "m", "ts", "in", &[], false).is_err());
        assert_eq!(
            project(&month, "m", "ts", "notnull", &[], true).unwrap(),
            "m NOT NULL"
        );
    }

    #[test]
    fn describe_lists_identity() {
        let transform = TimestampTransform::get(PrimitiveType::Timestamp, "Day", Some("+05:00"))
            .unwrap();
        let lines = describe(&transform, "day");
        assert_eq!(lines[0], "transform:    day[+05:00]");
        assert!(lines[4].ends_with("date"));
    }

    #[test]
    fn human_renders_partition_values() {
        let hour = TimestampTransform::utc(Granularity::Hour);
        let lines = human(&hour, &strings(&["0", "null", "-1"])).unwrap();
        assert_eq!(lines, vec!["1970-01-01-00", "null", "1969-12-31-23"]);

        assert!(human(&hour, &strings(&["9999999999"])).is_err());
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = RuntimeConfig::default();
        CliOverrides {
            granularity: Some("hour".to_string()),
            offset: Some("-03:30".to_string()),
            partition_field: None,
            log_level: Some("trace".to_string()),
        }
        .apply_to(&mut config);

        assert_eq!(config.transform.granularity, "hour");
        assert_eq!(config.transform.offset.as_deref(), Some("-03:30"));
        assert_eq!(config.transform.partition_field_name(), "hour");
        assert_eq!(config.logging.level, "trace");
    }
}
