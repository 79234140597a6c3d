//! pingwatch-core: interval detection over ping monitoring logs.
//!
//! Takes already-tokenized `(timestamp, host, rtt)` records and derives
//! failure periods (runs of timeouts) and high-load periods (runs where a
//! trailing average RTT reaches a threshold), per host and per network.
//! Pure computation: no file IO, no async, no shared state.

pub mod average;
pub mod detect;
pub mod duration;
pub mod error;
pub mod network;
pub mod record;
pub mod scanner;
pub mod series;

pub use average::{AveragedSample, attach_moving_averages, with_moving_average};
pub use detect::{DEFAULT_THRESHOLD_MS, DetectionMode, DetectionParams, Report, analyze};
pub use duration::{ONGOING, format_elapsed, format_timestamp};
pub use error::ScanError;
pub use network::{aggregate_by_network, network_address};
pub use record::{KeyedSample, RawRecord, Sample, normalize, normalize_all};
pub use scanner::{Interval, RunPolicy, failure_periods, highload_periods, scan_runs};
pub use series::{KeyedSeries, Observation, build_series};
