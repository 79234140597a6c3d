//! End-to-end detection: raw records in, a report of intervals out.

use serde::Serialize;

use crate::average::attach_moving_averages;
use crate::error::ScanError;
use crate::network::aggregate_by_network;
use crate::record::{RawRecord, normalize_all};
use crate::scanner::{Interval, RunPolicy, failure_periods, highload_periods};
use crate::series::{KeyedSeries, build_series};

/// Default high-load threshold (ms). High enough that nothing qualifies.
pub const DEFAULT_THRESHOLD_MS: i64 = 4_294_967_295;

/// Validated detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionParams {
    /// Minimum timeout run length reported as a failure.
    pub continuous_timeout: usize,
    /// Number of trailing pings averaged for load detection.
    pub window_size: usize,
    /// Window average (ms) at or above which a sample counts as high load.
    pub threshold_ms: i64,
}

impl DetectionParams {
    /// Validate caller-supplied values.
    ///
    /// `window_size < 1` and `threshold_ms < 0` are rejected. A
    /// `continuous_timeout` below 1 is accepted and behaves as 1.
    pub fn new(
        continuous_timeout: i64,
        window_size: i64,
        threshold_ms: i64,
    ) -> Result<Self, ScanError> {
        if window_size < 1 {
            return Err(ScanError::InvalidParameter {
                name: "m",
                value: window_size,
                requirement: "an integer >= 1",
            });
        }
        if threshold_ms < 0 {
            return Err(ScanError::InvalidParameter {
                name: "t",
                value: threshold_ms,
                requirement: "an integer >= 0",
            });
        }
        Ok(Self {
            continuous_timeout: usize::try_from(continuous_timeout.max(1)).unwrap_or(usize::MAX),
            window_size: usize::try_from(window_size).unwrap_or(usize::MAX),
            threshold_ms,
        })
    }

    fn failure_policy(&self) -> RunPolicy {
        RunPolicy::at_least(self.continuous_timeout)
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            continuous_timeout: 1,
            window_size: 1,
            threshold_ms: DEFAULT_THRESHOLD_MS,
        }
    }
}

/// Which passes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    /// Per-host failure periods only.
    FailuresOnly,
    /// Per-host failures, per-host high load, and per-network failures.
    #[default]
    Full,
}

/// Intervals from every pass that ran, keyed by host or network address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Report {
    pub failures_by_host: KeyedSeries<Interval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highload_by_host: Option<KeyedSeries<Interval>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures_by_network: Option<KeyedSeries<Interval>>,
}

/// Run the detection pipeline over already-tokenized log records.
///
/// Fails on the first malformed record or host key; no partial report is
/// returned.
pub fn analyze(
    records: &[RawRecord],
    params: &DetectionParams,
    mode: DetectionMode,
) -> Result<Report, ScanError> {
    let samples = normalize_all(records)?;
    tracing::debug!(records = samples.len(), "normalized records");

    let by_host = build_series(samples);
    let failures_by_host = failure_periods(&by_host, params.failure_policy());

    if mode == DetectionMode::FailuresOnly {
        return Ok(Report {
            failures_by_host,
            ..Report::default()
        });
    }

    let averaged = attach_moving_averages(&by_host, params.window_size);
    let highload_by_host = highload_periods(&averaged, params.threshold_ms as f64);

    let by_network = aggregate_by_network(&averaged)?;
    let failures_by_network = failure_periods(&by_network, params.failure_policy());

    tracing::debug!(
        hosts = by_host.len(),
        networks = by_network.len(),
        "detection complete"
    );

    Ok(Report {
        failures_by_host,
        highload_by_host: Some(highload_by_host),
        failures_by_network: Some(failures_by_network),
    })
}
