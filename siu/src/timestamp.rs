//! HL7 flexible-precision timestamps
//!
//! HL7 datetimes are left-anchored digit strings: `YYYY`, `YYYYMM`,
//! `YYYYMMDD`, and so on up to fractional seconds, with an optional
//! `±HHMM` offset. Producers send whatever precision they have, so the
//! parsed value keeps an explicit precision indicator next to the
//! normalized ISO rendering instead of silently inventing midnight-level
//! accuracy.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// How much of the timestamp the producer actually stated
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Subsecond,
}

/// Reason a timestamp string was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("empty timestamp")]
    Empty,
    #[error("{0:?} is not a valid HL7 timestamp")]
    Invalid(String),
}

/// A normalized HL7 timestamp: padded ISO datetime plus stated precision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    datetime: NaiveDateTime,
    offset: Option<FixedOffset>,
    fraction: Option<String>,
    precision: Precision,
}

impl Timestamp {
    /// Parse an HL7 timestamp string
    ///
    /// Accepted forms: `YYYY`, `YYYYMM`, `YYYYMMDD`, `YYYYMMDDHH`,
    /// `YYYYMMDDHHMM`, `YYYYMMDDHHMMSS`, `YYYYMMDDHHMMSS.S+`, each with an
    /// optional trailing `±HHMM` offset. Unstated positions default to
    /// January / the 1st / midnight in the rendering; the [`Precision`]
    /// records what was actually said.
    pub fn parse(input: &str) -> Result<Self, TimestampError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TimestampError::Empty);
        }
        let invalid = || TimestampError::Invalid(trimmed.to_owned());

        let (body, offset) = match trimmed.find(['+', '-']) {
            Some(pos) => {
                let (body, tail) = trimmed.split_at(pos);
                (body, Some(parse_offset(tail).ok_or_else(invalid)?))
            }
            None => (trimmed, None),
        };

        let (digits, fraction) = match body.find('.') {
            Some(dot) => {
                let fraction = &body[dot + 1..];
                if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                (&body[..dot], Some(fraction.to_owned()))
            }
            None => (body, None),
        };

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.is_some() && digits.len() != 14 {
            return Err(invalid());
        }

        let precision = match (digits.len(), &fraction) {
            (14, Some(_)) => Precision::Subsecond,
            (14, None) => Precision::Second,
            (12, None) => Precision::Minute,
            (10, None) => Precision::Hour,
            (8, None) => Precision::Day,
            (6, None) => Precision::Month,
            (4, None) => Precision::Year,
            _ => return Err(invalid()),
        };

        let part = |range: core::ops::Range<usize>, default: u32| -> Result<u32, TimestampError> {
            if digits.len() >= range.end {
                digits[range].parse().map_err(|_| invalid())
            } else {
                Ok(default)
            }
        };

        let year: i32 = digits[0..4].parse().map_err(|_| invalid())?;
        let month = part(4..6, 1)?;
        let day = part(6..8, 1)?;
        let hour = part(8..10, 0)?;
        let minute = part(10..12, 0)?;
        let second = part(12..14, 0)?;

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)?;

        Ok(Self {
            datetime: NaiveDateTime::new(date, time),
            offset,
            fraction,
            precision,
        })
    }

    /// ISO-style rendering, padded to full datetime, with the declared
    /// offset as `±HH:MM` when present
    pub fn iso(&self) -> String {
        let mut out = self.datetime.format("%Y-%m-%dT%H:%M:%S").to_string();
        if let Some(fraction) = &self.fraction {
            out.push('.');
            out.push_str(fraction);
        }
        if let Some(offset) = self.offset {
            out.push_str(&offset.to_string());
        }
        out
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Timestamp", 2)?;
        state.serialize_field("iso", &self.iso())?;
        state.serialize_field("precision", &self.precision)?;
        state.end()
    }
}

/// Parse a `±HHMM` offset suffix
fn parse_offset(tail: &str) -> Option<FixedOffset> {
    let (sign, digits) = tail.split_at(1);
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[0..2].parse().ok()?;
    let minutes: i32 = digits[2..4].parse().ok()?;
    let seconds = hours * 3600 + minutes * 60;
    match sign {
        "+" => FixedOffset::east_opt(seconds),
        "-" => FixedOffset::west_opt(seconds),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_second_precision() {
        let ts = Timestamp::parse("20250502130000").unwrap();
        assert_eq!(ts.iso(), "2025-05-02T13:00:00");
        assert_eq!(ts.precision(), Precision::Second);
    }

    #[test]
    fn year_only_pads_and_keeps_precision() {
        let ts = Timestamp::parse("1985").unwrap();
        assert_eq!(ts.iso(), "1985-01-01T00:00:00");
        assert_eq!(ts.precision(), Precision::Year);
    }

    #[test]
    fn each_precision_rung() {
        let cases = [
            ("2025", Precision::Year),
            ("202505", Precision::Month),
            ("20250502", Precision::Day),
            ("2025050213", Precision::Hour),
            ("202505021330", Precision::Minute),
            ("20250502133059", Precision::Second),
            ("20250502133059.25", Precision::Subsecond),
        ];
        for (input, precision) in cases {
            assert_eq!(Timestamp::parse(input).unwrap().precision(), precision, "{input}");
        }
    }

    #[test]
    fn positive_offset_renders_with_colon() {
        let ts = Timestamp::parse("20250502130000+0500").unwrap();
        assert_eq!(ts.iso(), "2025-05-02T13:00:00+05:00");
    }

    #[test]
    fn negative_offset() {
        let ts = Timestamp::parse("20250502130000-0630").unwrap();
        assert_eq!(ts.iso(), "2025-05-02T13:00:00-06:30");
        assert_eq!(ts.offset(), FixedOffset::west_opt(6 * 3600 + 1800));
        assert_eq!(
            ts.datetime(),
            NaiveDate::from_ymd_opt(2025, 5, 2)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn fractional_seconds_are_kept_verbatim() {
        let ts = Timestamp::parse("20250502133059.047").unwrap();
        assert_eq!(ts.iso(), "2025-05-02T13:30:59.047");
    }

    #[test]
    fn rejects_invalid_calendar_dates() {
        assert!(Timestamp::parse("20251302").is_err()); // month 13
        assert!(Timestamp::parse("20250230").is_err()); // Feb 30
        assert!(Timestamp::parse("20250502250000").is_err()); // hour 25
    }

    #[test]
    fn rejects_odd_lengths_and_nondigits() {
        assert!(Timestamp::parse("202505021").is_err());
        assert!(Timestamp::parse("2025-05-02").is_err());
        assert!(Timestamp::parse("20AB").is_err());
        assert!(Timestamp::parse("").is_err());
        assert!(Timestamp::parse("  ").is_err());
    }

    #[test]
    fn rejects_malformed_offsets() {
        assert!(Timestamp::parse("20250502+05").is_err());
        assert!(Timestamp::parse("20250502+05X0").is_err());
    }

    #[test]
    fn fraction_requires_full_seconds() {
        assert!(Timestamp::parse("20250502.5").is_err());
    }

    #[test]
    fn serializes_iso_and_precision() {
        let ts = Timestamp::parse("20250502").unwrap();
        let json = serde_json::to_value(&ts).unwrap();
        assert_eq!(json["iso"], "2025-05-02T00:00:00");
        assert_eq!(json["precision"], "day");
    }
}
