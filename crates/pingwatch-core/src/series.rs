//! Series builder: group samples by key and order each group in time.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::record::{KeyedSample, Sample};

/// Samples grouped by key, each group in ascending timestamp order.
///
/// A `BTreeMap` keeps report output stable across runs; nothing in the
/// detection depends on cross-key ordering.
pub type KeyedSeries<T> = BTreeMap<String, Vec<T>>;

/// Anything carrying a timestamp and an optional round-trip time.
pub trait Observation {
    fn timestamp(&self) -> NaiveDateTime;
    fn rtt_ms(&self) -> Option<i64>;
}

impl Observation for Sample {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn rtt_ms(&self) -> Option<i64> {
        self.rtt_ms
    }
}

/// Group samples by key and stable-sort each group by timestamp.
///
/// Samples with equal timestamps keep their input order.
pub fn build_series(samples: impl IntoIterator<Item = KeyedSample>) -> KeyedSeries<Sample> {
    let mut series: KeyedSeries<Sample> = BTreeMap::new();
    for KeyedSample { key, sample } in samples {
        series.entry(key).or_default().push(sample);
    }
    for group in series.values_mut() {
        sort_chronologically(group);
    }
    tracing::debug!(keys = series.len(), "built keyed series");
    series
}

/// Stable sort by timestamp.
pub fn sort_chronologically<T: Observation>(group: &mut [T]) {
    group.sort_by_key(|s| s.timestamp());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 10, 19)
            .unwrap()
            .and_hms_opt(0, 0, sec)
            .unwrap()
    }

    fn keyed(key: &str, sec: u32, rtt: Option<i64>) -> KeyedSample {
        KeyedSample {
            key: key.to_string(),
            sample: Sample::new(ts(sec), rtt),
        }
    }

    #[test]
    fn groups_by_key() {
        let series = build_series(vec![
            keyed("a", 1, Some(1)),
            keyed("b", 2, Some(2)),
            keyed("a", 3, None),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series["a"].len(), 2);
        assert_eq!(series["b"].len(), 1);
    }

    #[test]
    fn sorts_out_of_order_lines() {
        let series = build_series(vec![
            keyed("a", 30, Some(3)),
            keyed("a", 10, Some(1)),
            keyed("a", 20, Some(2)),
        ]);
        let rtts: Vec<_> = series["a"].iter().map(|s| s.rtt_ms).collect();
        assert_eq!(rtts, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn equal_timestamps_keep_source_order() {
        let series = build_series(vec![
            keyed("a", 5, Some(7)),
            keyed("a", 1, Some(0)),
            keyed("a", 5, None),
            keyed("a", 5, Some(9)),
        ]);
        let rtts: Vec<_> = series["a"].iter().map(|s| s.rtt_ms).collect();
        assert_eq!(rtts, vec![Some(0), Some(7), None, Some(9)]);
    }

    #[test]
    fn empty_input_builds_empty_series() {
        assert!(build_series(Vec::new()).is_empty());
    }
}
