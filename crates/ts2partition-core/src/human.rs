//! Human-readable rendering of partition values
//!
//! Partition values are unit counts since the epoch; rendering turns them
//! back into the calendar label of the bucket they name.

use chrono::{DateTime, NaiveDate};

use crate::error::{Result, TransformError};
use crate::transform::Granularity;
use crate::types::EPOCH_DAYS_FROM_CE;

/// Renders a partition value for a granularity
pub trait HumanFormatter {
    fn format(&self, granularity: Granularity, value: i32) -> Result<String>;
}

/// Calendar labels: `2021`, `2021-06`, `2021-06-15`, `2021-06-15-10`
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarFormatter;

impl HumanFormatter for CalendarFormatter {
    fn format(&self, granularity: Granularity, value: i32) -> Result<String> {
        match granularity {
            Granularity::Year => Ok(human_year(value)),
            Granularity::Month => Ok(human_month(value)),
            Granularity::Day => human_day(value),
            Granularity::Hour => human_hour(value),
        }
    }
}

pub fn human_year(years: i32) -> String {
    format!("{:04}", 1970 + i64::from(years))
}

pub fn human_month(months: i32) -> String {
    let months = i64::from(months);
    format!(
        "{:04}-{:02}",
        1970 + months.div_euclid(12),
        months.rem_euclid(12) + 1
    )
}

pub fn human_day(days: i32) -> Result<String> {
    let date = days
        .checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| {
            TransformError::out_of_range(format!("{} days from epoch has no calendar date", days))
        })?;
    Ok(date.format("%Y-%m-%d").to_string())
}

pub fn human_hour(hours: i32) -> Result<String> {
    let ts = DateTime::from_timestamp(i64::from(hours) * 3_600, 0).ok_or_else(|| {
        TransformError::out_of_range(format!("{} hours from epoch has no calendar time", hours))
    })?;
    Ok(ts.format("%Y-%m-%d-%H").to_string())
}
