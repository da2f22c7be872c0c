//! Timestamp partition transforms: year, month, day and hour
//!
//! A [`TimestampTransform`] maps microseconds since the epoch to a whole
//! number of granularity units since the epoch, after shifting the instant by
//! a fixed zone offset. The count is non-decreasing in its input for any
//! granularity and offset.

mod bucket;
mod granularity;
mod offset;

pub use granularity::Granularity;
pub use offset::ZoneOffset;

use std::fmt;

use tracing::debug;

use crate::error::{Result, TransformError};
use crate::expr::{BoundPredicate, UnboundPredicate};
use crate::human::{CalendarFormatter, HumanFormatter};
use crate::projection::{Projector, SameTransformProjection};
use crate::types::{Datum, PrimitiveType};

/// A timestamp partition transform
///
/// Identity is structural over granularity, name and offset; instances are
/// immutable and can be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimestampTransform {
    granularity: Granularity,
    name: String,
    offset: ZoneOffset,
}

impl TimestampTransform {
    /// Build the transform named `name` (case-insensitive) for a column of `source_type`
    ///
    /// `offset_id` defaults to UTC when absent.
    pub fn get(source_type: PrimitiveType, name: &str, offset_id: Option<&str>) -> Result<Self> {
        if source_type != PrimitiveType::Timestamp {
            return Err(TransformError::unsupported_type(source_type));
        }
        let granularity = name.parse::<Granularity>()?;
        let offset = ZoneOffset::parse_optional(offset_id)?;

        debug!(
            granularity = %granularity,
            offset = %offset,
            "created timestamp transform"
        );

        Ok(Self {
            granularity,
            name: name.to_lowercase(),
            offset,
        })
    }

    pub fn new(granularity: Granularity, offset: ZoneOffset) -> Self {
        Self {
            granularity,
            name: granularity.name().to_string(),
            offset,
        }
    }

    pub fn utc(granularity: Granularity) -> Self {
        Self::new(granularity, ZoneOffset::UTC)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> ZoneOffset {
        self.offset
    }

    /// Partition value for a timestamp in microseconds; absent input stays absent
    pub fn apply(&self, timestamp_micros: Option<i64>) -> Result<Option<i32>> {
        timestamp_micros.map(|micros| self.apply_value(micros)).transpose()
    }

    /// Partition value for a non-null timestamp in microseconds
    pub fn apply_value(&self, timestamp_micros: i64) -> Result<i32> {
        // fractional seconds never change the bucket
        let local_seconds = timestamp_micros / bucket::MICROS_PER_SECOND
            + i64::from(self.offset.total_seconds());
        let units = bucket::units_since_epoch(self.granularity, local_seconds)?;
        i32::try_from(units).map_err(|_| {
            TransformError::out_of_range(format!(
                "{} {}s since epoch does not fit a partition value",
                units, self.granularity
            ))
        })
    }

    pub fn can_transform(&self, source_type: PrimitiveType) -> bool {
        source_type == PrimitiveType::Timestamp
    }

    /// `date` for day partitions, `int` for the rest
    pub fn result_type(&self, _source_type: PrimitiveType) -> PrimitiveType {
        match self.granularity {
            Granularity::Day => PrimitiveType::Date,
            _ => PrimitiveType::Int,
        }
    }

    /// Wrap a partition value in the datum type this transform produces
    pub fn to_datum(&self, value: i32) -> Datum {
        match self.granularity {
            Granularity::Day => Datum::date(value),
            _ => Datum::int(value),
        }
    }

    pub fn preserves_order(&self) -> bool {
        true
    }

    /// Whether ordering by this transform also orders by `other`
    pub fn satisfies_order_of(&self, other: &TimestampTransform) -> bool {
        self.offset == other.offset && self.granularity <= other.granularity
    }

    /// Inclusive projection: keeps every partition that may hold a matching row
    pub fn project(
        &self,
        field_name: &str,
        predicate: &BoundPredicate,
    ) -> Result<Option<UnboundPredicate>> {
        self.projector().project_inclusive(field_name, predicate)
    }

    /// Strict projection: selects only partitions whose rows all match
    pub fn project_strict(
        &self,
        field_name: &str,
        predicate: &BoundPredicate,
    ) -> Result<Option<UnboundPredicate>> {
        self.projector().project_strict(field_name, predicate)
    }

    pub fn projector(&self) -> Projector<'_, SameTransformProjection> {
        Projector::new(self, SameTransformProjection)
    }

    /// Human-readable partition value, `null` when absent
    pub fn to_human_string(&self, value: Option<i32>) -> Result<String> {
        self.to_human_string_with(&CalendarFormatter, value)
    }

    pub fn to_human_string_with<F: HumanFormatter>(
        &self,
        formatter: &F,
        value: Option<i32>,
    ) -> Result<String> {
        match value {
            None => Ok("null".to_string()),
            Some(value) => formatter.format(self.granularity, value),
        }
    }
}

impl fmt::Display for TimestampTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.offset.is_utc() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}[{}]", self.name, self.offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    // 2021-06-15T10:30:00Z
    const MID_JUNE_2021: i64 = 1_623_753_000_000_000;

    fn transform(name: &str, offset: Option<&str>) -> TimestampTransform {
        TimestampTransform::get(PrimitiveType::Timestamp, name, offset).unwrap()
    }

    fn hash_of(t: &TimestampTransform) -> u64 {
        let mut hasher = DefaultHasher::new();
        t.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_get_rejects_non_timestamp() {
        let err = TimestampTransform::get(PrimitiveType::Long, "day", None).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedType { .. }));
        let err = TimestampTransform::get(PrimitiveType::Date, "day", None).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedType { .. }));
    }

    #[test]
    fn test_get_rejects_unknown_name() {
        let err = TimestampTransform::get(PrimitiveType::Timestamp, "minute", None).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedGranularity { .. }));
    }

    #[test]
    fn test_get_rejects_bad_offset() {
        let err =
            TimestampTransform::get(PrimitiveType::Timestamp, "day", Some("+25:00")).unwrap_err();
        assert!(matches!(err, TransformError::InvalidOffset { .. }));
    }

    #[test]
    fn test_get_lowercases_name() {
        let t = transform("DAY", None);
        assert_eq!(t.name(), "day");
        assert_eq!(t.granularity(), Granularity::Day);
        assert_eq!(t, TimestampTransform::utc(Granularity::Day));
    }

    #[test]
    fn test_apply_scenario() {
        let hours = MID_JUNE_2021 / 1_000_000 / 3_600;
        let days = MID_JUNE_2021 / 1_000_000 / 86_400;
        assert_eq!(transform("hour", None).apply(Some(MID_JUNE_2021)).unwrap(), Some(hours as i32));
        assert_eq!(transform("day", None).apply(Some(MID_JUNE_2021)).unwrap(), Some(days as i32));
        assert_eq!(days, 18_793);
        assert_eq!(transform("month", None).apply(Some(MID_JUNE_2021)).unwrap(), Some(51 * 12 + 5));
        assert_eq!(transform("year", None).apply(Some(MID_JUNE_2021)).unwrap(), Some(51));
    }

    #[test]
    fn test_apply_epoch_and_null() {
        for granularity in Granularity::ALL {
            let t = TimestampTransform::utc(granularity);
            assert_eq!(t.apply(Some(0)).unwrap(), Some(0));
            assert_eq!(t.apply(None).unwrap(), None);
        }
    }

    #[test]
    fn test_apply_discards_fractional_seconds() {
        let hour = transform("hour", None);
        assert_eq!(hour.apply_value(3_599_999_999).unwrap(), 0);
        assert_eq!(hour.apply_value(3_600_000_000).unwrap(), 1);
        // truncation, not flooring: -0.5s stays in the epoch second
        assert_eq!(hour.apply_value(-500_000).unwrap(), 0);
    }

    #[test]
    fn test_apply_negative_timestamps() {
        let day = transform("day", None);
        // 1969-12-30T12:00:00Z
        assert_eq!(day.apply_value(-(36 * 3_600) * 1_000_000).unwrap(), -1);
        let year = transform("year", None);
        // 1968-06-01T00:00:00Z
        assert_eq!(year.apply_value(-50_025_600 * 1_000_000).unwrap(), -1);
    }

    #[test]
    fn test_offset_shifts_boundaries() {
        let utc = transform("day", None);
        let plus_five = transform("day", Some("+05:00"));
        // 2021-06-15T20:00:00Z is already 2021-06-16 at +05:00
        let evening = 1_623_787_200_000_000;
        assert_eq!(
            plus_five.apply_value(evening).unwrap(),
            utc.apply_value(evening).unwrap() + 1
        );
        assert_eq!(
            plus_five.apply_value(evening).unwrap(),
            utc.apply_value(evening + 5 * 3_600 * 1_000_000).unwrap()
        );

        let utc_hour = transform("hour", None);
        let plus_five_hour = transform("hour", Some("+05:00"));
        assert_eq!(
            plus_five_hour.apply_value(MID_JUNE_2021).unwrap(),
            utc_hour.apply_value(MID_JUNE_2021).unwrap() + 5
        );
    }

    #[test]
    fn test_offset_crosses_year_boundary() {
        // 2020-12-31T22:00:00Z
        let new_years_eve = 1_609_452_000_000_000;
        assert_eq!(transform("year", None).apply_value(new_years_eve).unwrap(), 50);
        assert_eq!(
            transform("year", Some("+03:00")).apply_value(new_years_eve).unwrap(),
            51
        );
        assert_eq!(
            transform("month", Some("+03:00")).apply_value(new_years_eve).unwrap(),
            51 * 12
        );
    }

    #[test]
    fn test_apply_out_of_range() {
        let err = transform("hour", None).apply_value(i64::MAX).unwrap_err();
        assert!(matches!(err, TransformError::OutOfRange { .. }));
        assert!(transform("day", None).apply_value(i64::MIN).is_ok());
    }

    #[test]
    fn test_result_type() {
        let ts = PrimitiveType::Timestamp;
        assert_eq!(transform("day", None).result_type(ts), PrimitiveType::Date);
        assert_eq!(transform("hour", None).result_type(ts), PrimitiveType::Int);
        assert_eq!(transform("month", None).result_type(ts), PrimitiveType::Int);
        assert_eq!(transform("year", None).result_type(ts), PrimitiveType::Int);
        assert_eq!(transform("day", None).to_datum(3), Datum::date(3));
        assert_eq!(transform("year", None).to_datum(3), Datum::int(3));
    }

    #[test]
    fn test_can_transform() {
        let t = transform("month", None);
        assert!(t.can_transform(PrimitiveType::Timestamp));
        assert!(!t.can_transform(PrimitiveType::Timestamptz));
        assert!(!t.can_transform(PrimitiveType::Long));
    }

    #[test]
    fn test_equality_and_hash() {
        let a = transform("day", Some("+05:00"));
        let b = transform("Day", Some("+0500"));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        assert_ne!(a, transform("day", None));
        assert_ne!(a, transform("hour", Some("+05:00")));
        assert_eq!(transform("day", Some("+00:00")), transform("day", None));
    }

    #[test]
    fn test_display() {
        assert_eq!(transform("day", None).to_string(), "day");
        assert_eq!(transform("day", Some("Z")).to_string(), "day");
        assert_eq!(transform("hour", Some("+05:30")).to_string(), "hour[+05:30]");
        assert_eq!(transform("YEAR", Some("-08")).to_string(), "year[-08:00]");
    }

    #[test]
    fn test_order_satisfaction() {
        let hour = transform("hour", None);
        let day = transform("day", None);
        assert!(hour.preserves_order());
        assert!(hour.satisfies_order_of(&day));
        assert!(day.satisfies_order_of(&day));
        assert!(!day.satisfies_order_of(&hour));
        assert!(!hour.satisfies_order_of(&transform("day", Some("+01:00"))));
    }

    #[test]
    fn test_human_string() {
        let day = transform("day", None);
        assert_eq!(day.to_human_string(None).unwrap(), "null");
        assert_eq!(day.to_human_string(Some(18_793)).unwrap(), "2021-06-15");
        assert_eq!(transform("year", None).to_human_string(Some(51)).unwrap(), "2021");
    }
}
