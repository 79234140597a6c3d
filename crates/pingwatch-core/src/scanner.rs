//! Contiguous-run detection over a key's chronological samples.
//!
//! One scanner, parametrized by a per-sample predicate, serves both passes:
//!
//! - **Failure periods**: runs of timed-out samples, optionally required to be
//!   at least `continuous_timeout` samples long.
//! - **High-load periods**: runs whose trailing window average is present and
//!   at or above the threshold. Every run is reported.
//!
//! A run starts at a sample matching the start predicate and lasts until the
//! first sample matching the stop predicate; that sample's timestamp is the
//! run's `end`. For failures the two predicates are complements. For high load
//! they are not: a sample with no window average neither starts a run nor
//! stops one. A run still open at the last sample is ongoing.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::average::AveragedSample;
use crate::duration::format_elapsed;
use crate::series::{KeyedSeries, Observation};

// ─── Types ──────────────────────────────────────────────────────────

/// A detected run of samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    /// Number of samples in the run (always >= 1).
    pub run_length: usize,
    pub start: NaiveDateTime,
    /// First sample after the run; `None` while ongoing.
    pub end: Option<NaiveDateTime>,
    /// Rendered `end - start`, empty while ongoing.
    pub duration: String,
}

impl Interval {
    pub fn new(run_length: usize, start: NaiveDateTime, end: Option<NaiveDateTime>) -> Self {
        let duration = end
            .map(|end| format_elapsed(end - start))
            .unwrap_or_default();
        Self {
            run_length,
            start,
            end,
            duration,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.end.is_none()
    }
}

/// Which runs are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    /// Runs shorter than this are dropped. `1` reports every run.
    pub min_run_length: usize,
}

impl RunPolicy {
    pub const EVERY_RUN: Self = Self { min_run_length: 1 };

    pub fn at_least(min_run_length: usize) -> Self {
        Self {
            min_run_length: min_run_length.max(1),
        }
    }
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self::EVERY_RUN
    }
}

// ─── Scanner ────────────────────────────────────────────────────────

/// Scan one chronologically ordered group for runs opened by `starts` and
/// closed by `stops`.
pub fn scan_runs<T, S, E>(group: &[T], starts: S, stops: E, policy: RunPolicy) -> Vec<Interval>
where
    T: Observation,
    S: Fn(&T) -> bool,
    E: Fn(&T) -> bool,
{
    let mut intervals = Vec::new();
    let mut i = 0;
    while i < group.len() {
        if starts(&group[i]) {
            let begin_i = i;
            let begin = group[i].timestamp();
            let mut end = None;
            while i < group.len() {
                if stops(&group[i]) {
                    end = Some(group[i].timestamp());
                    break;
                }
                i += 1;
            }
            let run_length = i - begin_i;
            if run_length >= policy.min_run_length {
                tracing::trace!(run_length, %begin, ongoing = end.is_none(), "run detected");
                intervals.push(Interval::new(run_length, begin, end));
            }
        }
        // Sample `i` is either outside a run or the one that ended it.
        i += 1;
    }
    intervals
}

/// Timeout runs for one group.
pub fn failure_period<T: Observation>(group: &[T], policy: RunPolicy) -> Vec<Interval> {
    scan_runs(
        group,
        |s| s.rtt_ms().is_none(),
        |s| s.rtt_ms().is_some(),
        policy,
    )
}

/// High-load runs for one group.
///
/// A run opens at a window average `>= threshold` and closes only at a
/// present average below it; samples without an average stay inside the run.
pub fn highload_period(group: &[AveragedSample], threshold: f64) -> Vec<Interval> {
    scan_runs(
        group,
        |s| s.window_average.is_some_and(|avg| avg >= threshold),
        |s| s.window_average.is_some_and(|avg| avg < threshold),
        RunPolicy::EVERY_RUN,
    )
}

/// Failure periods for every non-empty group.
///
/// Groups without any qualifying run are kept with an empty list.
pub fn failure_periods<T: Observation>(
    series: &KeyedSeries<T>,
    policy: RunPolicy,
) -> KeyedSeries<Interval> {
    series
        .iter()
        .filter(|(_, group)| !group.is_empty())
        .map(|(key, group)| (key.clone(), failure_period(group, policy)))
        .collect()
}

/// High-load periods for every non-empty group.
pub fn highload_periods(
    series: &KeyedSeries<AveragedSample>,
    threshold: f64,
) -> KeyedSeries<Interval> {
    series
        .iter()
        .filter(|(_, group)| !group.is_empty())
        .map(|(key, group)| (key.clone(), highload_period(group, threshold)))
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::average::with_moving_average;
    use crate::record::Sample;
    use chrono::{NaiveDate, TimeDelta};
    use proptest::prelude::*;

    /// Chronological samples; gaps of 0 produce equal timestamps.
    fn arb_group() -> impl Strategy<Value = Vec<Sample>> {
        proptest::collection::vec(
            (0i64..120, proptest::option::weighted(0.6, 0i64..400)),
            0..60,
        )
        .prop_map(|steps| {
            let base = NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            let mut at = base;
            steps
                .into_iter()
                .map(|(gap, rtt)| {
                    at += TimeDelta::seconds(gap);
                    Sample::new(at, rtt)
                })
                .collect()
        })
    }

    /// Lengths of maximal timeout runs, computed independently of the scanner.
    fn timeout_run_lengths(group: &[Sample]) -> Vec<usize> {
        let mut runs = Vec::new();
        let mut current = 0;
        for s in group {
            if s.rtt_ms.is_none() {
                current += 1;
            } else if current > 0 {
                runs.push(current);
                current = 0;
            }
        }
        if current > 0 {
            runs.push(current);
        }
        runs
    }

    fn assert_ordered(intervals: &[Interval]) -> Result<(), TestCaseError> {
        for iv in intervals {
            if let Some(end) = iv.end {
                prop_assert!(iv.start <= end);
            }
        }
        for pair in intervals.windows(2) {
            let end = pair[0].end;
            prop_assert!(end.is_some(), "only the last interval may be ongoing");
            prop_assert!(end.unwrap_or(pair[0].start) <= pair[1].start);
            prop_assert!(pair[0].start <= pair[1].start);
        }
        Ok(())
    }

    proptest! {
        /// Failure intervals are ordered and never overlap.
        #[test]
        fn failure_intervals_ordered(group in arb_group(), n in 1usize..5) {
            assert_ordered(&failure_period(&group, RunPolicy::at_least(n)))?;
        }

        /// High-load intervals are ordered and never overlap.
        #[test]
        fn highload_intervals_ordered(group in arb_group(), m in 1usize..5, t in 0i64..400) {
            let averaged = with_moving_average(&group, m);
            assert_ordered(&highload_period(&averaged, t as f64))?;
        }

        /// With N = 1 every maximal timeout run is reported.
        #[test]
        fn unit_minimum_reports_every_run(group in arb_group()) {
            let lengths: Vec<usize> = failure_period(&group, RunPolicy::EVERY_RUN)
                .iter()
                .map(|i| i.run_length)
                .collect();
            prop_assert_eq!(lengths, timeout_run_lengths(&group));
        }

        /// A run is reported iff its length reaches the minimum.
        #[test]
        fn minimum_filters_exactly(group in arb_group(), n in 1usize..6) {
            let all = failure_period(&group, RunPolicy::EVERY_RUN);
            let filtered = failure_period(&group, RunPolicy::at_least(n));
            let expected: Vec<Interval> =
                all.into_iter().filter(|i| i.run_length >= n).collect();
            prop_assert_eq!(filtered, expected);
        }
    }
}
