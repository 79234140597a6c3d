//! Record normalizer: raw log fields to typed samples.

use chrono::NaiveDateTime;

use crate::error::ScanError;

/// Log timestamp layout, e.g. `20201019133124`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Measurement text that marks a timed-out ping.
pub const TIMEOUT_MARKER: &str = "-";

/// One already-tokenized log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 0-based source line number, kept for error messages only.
    pub line_index: usize,
    pub timestamp: String,
    pub key: String,
    pub measurement: String,
}

impl RawRecord {
    pub fn new(
        line_index: usize,
        timestamp: impl Into<String>,
        key: impl Into<String>,
        measurement: impl Into<String>,
    ) -> Self {
        Self {
            line_index,
            timestamp: timestamp.into(),
            key: key.into(),
            measurement: measurement.into(),
        }
    }
}

/// A single ping observation. `rtt_ms == None` means the ping timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub rtt_ms: Option<i64>,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, rtt_ms: Option<i64>) -> Self {
        Self { timestamp, rtt_ms }
    }

    pub fn is_timeout(&self) -> bool {
        self.rtt_ms.is_none()
    }
}

/// A sample still attached to the key (host) it was logged for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedSample {
    pub key: String,
    pub sample: Sample,
}

/// Normalize one raw record.
pub fn normalize(record: &RawRecord) -> Result<KeyedSample, ScanError> {
    let timestamp = parse_timestamp(&record.timestamp, record.line_index)?;
    let rtt_ms = parse_measurement(&record.measurement, record.line_index)?;
    Ok(KeyedSample {
        key: record.key.clone(),
        sample: Sample::new(timestamp, rtt_ms),
    })
}

/// Normalize a batch, failing on the first malformed record.
pub fn normalize_all(records: &[RawRecord]) -> Result<Vec<KeyedSample>, ScanError> {
    records.iter().map(normalize).collect()
}

/// Parse a `YYYYMMDDHHMMSS` timestamp. Exactly 14 ASCII digits are required.
pub fn parse_timestamp(text: &str, line_index: usize) -> Result<NaiveDateTime, ScanError> {
    let err = || ScanError::MalformedTimestamp {
        line: line_index + 1,
    };
    if text.len() != 14 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|_| err())
}

/// Parse a round-trip time. `-` is a timeout; anything else must be an integer.
///
/// Surrounding whitespace is tolerated around a number but not around the
/// timeout marker, and the empty string is an error rather than a timeout.
/// Values outside the `i64` range are reported as malformed.
pub fn parse_measurement(text: &str, line_index: usize) -> Result<Option<i64>, ScanError> {
    if text == TIMEOUT_MARKER {
        return Ok(None);
    }
    text.trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ScanError::MalformedMeasurement {
            line: line_index + 1,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_compact_timestamp() {
        let ts = parse_timestamp("20201019133124", 0).unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 10, 19)
            .unwrap()
            .and_hms_opt(13, 31, 24)
            .unwrap();
        assert_eq!(ts, expected);
    }

    #[test]
    fn dashed_timestamp_reports_one_based_line() {
        let err = parse_timestamp("2021-01-01", 4).unwrap_err();
        assert_eq!(err, ScanError::MalformedTimestamp { line: 5 });
        assert!(err.to_string().contains("5"));
    }

    #[test]
    fn calendar_invalid_timestamp_rejected() {
        assert!(parse_timestamp("20210230000000", 0).is_err());
        assert!(parse_timestamp("20210101250000", 0).is_err());
    }

    #[test]
    fn wrong_width_timestamp_rejected() {
        assert!(parse_timestamp("2021010100000", 0).is_err());
        assert!(parse_timestamp("202101010000000", 0).is_err());
        assert!(parse_timestamp(" 20210101000000", 0).is_err());
    }

    #[test]
    fn dash_is_timeout() {
        assert_eq!(parse_measurement("-", 0).unwrap(), None);
    }

    #[test]
    fn integer_measurement() {
        assert_eq!(parse_measurement("12", 0).unwrap(), Some(12));
        assert_eq!(parse_measurement("0", 0).unwrap(), Some(0));
    }

    #[test]
    fn empty_measurement_is_error_not_timeout() {
        assert_eq!(
            parse_measurement("", 2).unwrap_err(),
            ScanError::MalformedMeasurement { line: 3 }
        );
    }

    #[test]
    fn non_integer_measurement_rejected() {
        assert!(parse_measurement("1.5", 0).is_err());
        assert!(parse_measurement("abc", 0).is_err());
        assert!(parse_measurement(" - ", 0).is_err());
    }

    #[test]
    fn out_of_range_measurement_is_malformed() {
        assert_eq!(parse_measurement("9223372036854775807", 0).unwrap(), Some(i64::MAX));
        assert_eq!(
            parse_measurement("9223372036854775808", 6).unwrap_err(),
            ScanError::MalformedMeasurement { line: 7 }
        );
    }

    #[test]
    fn normalize_keeps_key() {
        let rec = RawRecord::new(0, "20201019133124", "10.20.30.1/16", "2");
        let ks = normalize(&rec).unwrap();
        assert_eq!(ks.key, "10.20.30.1/16");
        assert_eq!(ks.sample.rtt_ms, Some(2));
        assert!(!ks.sample.is_timeout());
    }

    #[test]
    fn normalize_all_stops_at_first_error() {
        let records = vec![
            RawRecord::new(0, "20201019133124", "h", "x"),
            RawRecord::new(1, "bad", "h", "1"),
        ];
        assert_eq!(
            normalize_all(&records).unwrap_err(),
            ScanError::MalformedMeasurement { line: 1 }
        );
    }
}
