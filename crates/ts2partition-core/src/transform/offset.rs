//! Fixed UTC offsets parsed from offset ids like `+05:30`

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TransformError};

const MAX_OFFSET_SECONDS: i32 = 18 * 3_600;

/// A fixed offset from UTC, in seconds
///
/// Equality is by total seconds, so `Z`, `+00:00` and an unspecified offset
/// are the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ZoneOffset {
    total_seconds: i32,
}

impl ZoneOffset {
    pub const UTC: ZoneOffset = ZoneOffset { total_seconds: 0 };

    pub fn of_total_seconds(total_seconds: i32) -> Result<Self> {
        if total_seconds.unsigned_abs() > MAX_OFFSET_SECONDS.unsigned_abs() {
            return Err(TransformError::invalid_offset(
                total_seconds.to_string(),
                "offset must be within -18:00 and +18:00",
            ));
        }
        Ok(Self { total_seconds })
    }

    /// Parse an offset id: `Z`, `+h`, `+hh`, `+hh:mm`, `+hhmm`, `+hh:mm:ss` or `+hhmmss`
    pub fn parse(id: &str) -> Result<Self> {
        if id == "Z" {
            return Ok(Self::UTC);
        }

        let invalid = |reason: &str| TransformError::invalid_offset(id, reason);

        let (sign, rest) = match id.as_bytes().first() {
            Some(b'+') => (1, &id[1..]),
            Some(b'-') => (-1, &id[1..]),
            _ => return Err(invalid("expected 'Z' or a leading '+' or '-'")),
        };
        if !rest.chars().all(|c| c.is_ascii_digit() || c == ':') {
            return Err(invalid("unexpected character"));
        }

        let (hours, minutes, seconds) = match rest.len() {
            1 | 2 => (rest, "0", "0"),
            4 if !rest.contains(':') => (&rest[0..2], &rest[2..4], "0"),
            5 if rest.as_bytes()[2] == b':' => (&rest[0..2], &rest[3..5], "0"),
            6 if !rest.contains(':') => (&rest[0..2], &rest[2..4], &rest[4..6]),
            8 if rest.as_bytes()[2] == b':' && rest.as_bytes()[5] == b':' => {
                (&rest[0..2], &rest[3..5], &rest[6..8])
            }
            _ => return Err(invalid("unrecognized offset format")),
        };

        let parse_part = |part: &str, max: i32, unit: &str| -> Result<i32> {
            let value = part
                .parse::<i32>()
                .map_err(|_| invalid("unrecognized offset format"))?;
            if value > max {
                return Err(invalid(&format!("{} out of range: {}", unit, value)));
            }
            Ok(value)
        };

        let total = parse_part(hours, 18, "hours")? * 3_600
            + parse_part(minutes, 59, "minutes")? * 60
            + parse_part(seconds, 59, "seconds")?;
        if total > MAX_OFFSET_SECONDS {
            return Err(invalid("offset must be within -18:00 and +18:00"));
        }

        Ok(Self {
            total_seconds: sign * total,
        })
    }

    /// Parse an optional id, defaulting to UTC
    pub fn parse_optional(id: Option<&str>) -> Result<Self> {
        id.map_or(Ok(Self::UTC), Self::parse)
    }

    pub fn total_seconds(&self) -> i32 {
        self.total_seconds
    }

    pub fn is_utc(&self) -> bool {
        self.total_seconds == 0
    }

    /// Canonical id: `Z`, `+hh:mm`, or `+hh:mm:ss`
    pub fn id(&self) -> String {
        if self.total_seconds == 0 {
            return "Z".to_string();
        }
        let sign = if self.total_seconds < 0 { '-' } else { '+' };
        let abs = self.total_seconds.abs();
        let (hours, minutes, seconds) = (abs / 3_600, (abs / 60) % 60, abs % 60);
        if seconds == 0 {
            format!("{}{:02}:{:02}", sign, hours, minutes)
        } else {
            format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
        }
    }
}

impl fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for ZoneOffset {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
