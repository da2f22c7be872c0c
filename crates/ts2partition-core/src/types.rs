//! Column types and typed literal values
//!
//! Only the subset of the table type system that partition transforms need:
//! the primitive type ids and a [`Datum`] literal that knows its own type.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::TransformError;

/// Days from 0001-01-01 (CE day 1) to the Unix epoch
pub(crate) const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Primitive column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Date,
    Time,
    Timestamp,
    Timestamptz,
    String,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Date => "date",
            PrimitiveType::Time => "time",
            PrimitiveType::Timestamp => "timestamp",
            PrimitiveType::Timestamptz => "timestamptz",
            PrimitiveType::String => "string",
        };
        f.write_str(name)
    }
}

impl FromStr for PrimitiveType {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "boolean" | "bool" => Ok(PrimitiveType::Boolean),
            "int" | "integer" => Ok(PrimitiveType::Int),
            "long" => Ok(PrimitiveType::Long),
            "float" => Ok(PrimitiveType::Float),
            "double" => Ok(PrimitiveType::Double),
            "date" => Ok(PrimitiveType::Date),
            "time" => Ok(PrimitiveType::Time),
            "timestamp" => Ok(PrimitiveType::Timestamp),
            "timestamptz" => Ok(PrimitiveType::Timestamptz),
            "string" => Ok(PrimitiveType::String),
            _ => Err(TransformError::invalid_predicate(format!(
                "unknown type: {}",
                s
            ))),
        }
    }
}

/// A literal value tagged with its type
///
/// Ordering is derived and only meaningful between datums of the same type;
/// it exists so literal sets have a deterministic iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Datum {
    Int(i32),
    Long(i64),
    /// Days since 1970-01-01
    Date(i32),
    /// Microseconds since 1970-01-01T00:00:00
    Timestamp(i64),
}

impl Datum {
    pub fn int(value: i32) -> Self {
        Datum::Int(value)
    }

    pub fn long(value: i64) -> Self {
        Datum::Long(value)
    }

    pub fn date(days: i32) -> Self {
        Datum::Date(days)
    }

    pub fn timestamp_micros(micros: i64) -> Self {
        Datum::Timestamp(micros)
    }

    pub fn data_type(&self) -> PrimitiveType {
        match self {
            Datum::Int(_) => PrimitiveType::Int,
            Datum::Long(_) => PrimitiveType::Long,
            Datum::Date(_) => PrimitiveType::Date,
            Datum::Timestamp(_) => PrimitiveType::Timestamp,
        }
    }

    /// Raw micros of a timestamp datum
    pub fn as_timestamp_micros(&self) -> Option<i64> {
        match self {
            Datum::Timestamp(micros) => Some(*micros),
            _ => None,
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Int(v) => write!(f, "{}", v),
            Datum::Long(v) => write!(f, "{}", v),
            Datum::Date(days) => match days
                .checked_add(EPOCH_DAYS_FROM_CE)
                .and_then(NaiveDate::from_num_days_from_ce_opt)
            {
                Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
                None => write!(f, "{}", days),
            },
            Datum::Timestamp(micros) => match DateTime::from_timestamp_micros(*micros) {
                Some(ts) => write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%S%.6f")),
                None => write!(f, "{}", micros),
            },
        }
    }
}
