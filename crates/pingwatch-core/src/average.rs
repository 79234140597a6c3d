//! Trailing moving average over a key's chronological samples.

use chrono::NaiveDateTime;

use crate::record::Sample;
use crate::series::{KeyedSeries, Observation};

/// A sample together with the average RTT of the trailing window ending at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragedSample {
    pub sample: Sample,
    /// `None` while the window is incomplete, or when the window's RTT sum is 0.
    pub window_average: Option<f64>,
}

impl Observation for AveragedSample {
    fn timestamp(&self) -> NaiveDateTime {
        self.sample.timestamp
    }

    fn rtt_ms(&self) -> Option<i64> {
        self.sample.rtt_ms
    }
}

/// Attach a trailing `window`-sample average to every sample of one group.
///
/// The first `window - 1` samples get no average. For later samples the
/// average is taken over the non-timeout measurements in the window; a window
/// whose measurements sum to zero (including an all-timeout window) yields
/// `None`. A real zero-latency window is therefore indistinguishable from
/// "no data". That is kept on purpose.
pub fn with_moving_average(group: &[Sample], window: usize) -> Vec<AveragedSample> {
    group
        .iter()
        .enumerate()
        .map(|(i, sample)| AveragedSample {
            sample: *sample,
            window_average: window_average(group, i, window),
        })
        .collect()
}

fn window_average(group: &[Sample], i: usize, window: usize) -> Option<f64> {
    if i + 1 < window || window == 0 {
        return None;
    }
    let (cnt, acc) = group[i + 1 - window..=i]
        .iter()
        .filter_map(|s| s.rtt_ms)
        .fold((0u64, 0i128), |(cnt, acc), rtt| (cnt + 1, acc + i128::from(rtt)));
    if acc == 0 {
        return None;
    }
    Some(acc as f64 / cnt as f64)
}

/// Attach moving averages to every group of a series.
pub fn attach_moving_averages(
    series: &KeyedSeries<Sample>,
    window: usize,
) -> KeyedSeries<AveragedSample> {
    series
        .iter()
        .map(|(key, group)| (key.clone(), with_moving_average(group, window)))
        .collect()
}
