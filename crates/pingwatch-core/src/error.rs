//! Error types for the detection pipeline.
//!
//! Every variant is fatal for the whole run: the pipeline stops at the first
//! error and returns no partial report.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Timestamp is not a calendar-valid `YYYYMMDDHHMMSS`. `line` is 1-based.
    #[error("malformed timestamp @line = {line}")]
    MalformedTimestamp { line: usize },

    /// Measurement is neither `-` nor an integer. `line` is 1-based.
    #[error("malformed ping value @line = {line}")]
    MalformedMeasurement { line: usize },

    #[error("malformed network key {key:?}: expected A.B.C.D/prefix")]
    MalformedNetworkKey { key: String },

    #[error("invalid parameter {name} = {value}: must be {requirement}")]
    InvalidParameter {
        name: &'static str,
        value: i64,
        requirement: &'static str,
    },
}
