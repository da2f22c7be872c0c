//! Unit counting between the epoch and a local wall-clock instant
//!
//! Counts are whole units between 1970-01-01T00:00:00 and the instant, so a
//! partial unit on either side of the epoch does not count. This keeps the
//! count non-decreasing in its input, which projection relies on.

use chrono::{DateTime, Datelike, Timelike};

use super::Granularity;
use crate::error::{Result, TransformError};

pub(crate) const MICROS_PER_SECOND: i64 = 1_000_000;
const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const EPOCH_YEAR: i64 = 1970;

/// Whole `granularity` units between the epoch and `local_seconds`
pub(crate) fn units_since_epoch(granularity: Granularity, local_seconds: i64) -> Result<i64> {
    match granularity {
        Granularity::Hour => Ok(local_seconds / SECONDS_PER_HOUR),
        Granularity::Day => Ok(local_seconds / SECONDS_PER_DAY),
        Granularity::Month => months_since_epoch(local_seconds),
        Granularity::Year => Ok(months_since_epoch(local_seconds)? / 12),
    }
}

/// Calendar months between the epoch and `local_seconds`
fn months_since_epoch(local_seconds: i64) -> Result<i64> {
    let local = DateTime::from_timestamp(local_seconds, 0)
        .ok_or_else(|| {
            TransformError::out_of_range(format!(
                "{} seconds from epoch is outside the supported calendar",
                local_seconds
            ))
        })?
        .naive_utc();

    let months = (i64::from(local.year()) - EPOCH_YEAR) * 12 + i64::from(local.month0());

    // before the epoch, a month only counts once it is complete
    let past_month_start = local.day() > 1 || local.num_seconds_from_midnight() > 0;
    if months < 0 && past_month_start {
        Ok(months + 1)
    } else {
        Ok(months)
    }
}
