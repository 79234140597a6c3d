//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::Parser;
use pingwatch_core::{DEFAULT_THRESHOLD_MS, DetectionMode};

#[derive(Parser, Debug)]
#[command(
    name = "pingwatch",
    version,
    about = "Report failure and high-load periods from a ping monitoring log"
)]
pub struct Cli {
    /// Comma-separated log: `YYYYMMDDHHMMSS,A.B.C.D/prefix,rtt-ms-or-'-'`
    pub log_file: PathBuf,

    /// Consecutive timeouts before a host counts as failed
    #[arg(
        short = 'N',
        long,
        alias = "N",
        env = "PINGWATCH_N",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub continuous_timeout: i64,

    /// Number of recent pings averaged for load detection (>= 1)
    #[arg(
        short = 'm',
        long = "window",
        alias = "m",
        env = "PINGWATCH_M",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub window: i64,

    /// Average RTT in ms at or above which a host counts as overloaded (>= 0)
    #[arg(
        short = 't',
        long,
        alias = "t",
        env = "PINGWATCH_T",
        default_value_t = DEFAULT_THRESHOLD_MS,
        allow_negative_numbers = true
    )]
    pub threshold: i64,

    /// Only report per-host failure periods
    #[arg(long)]
    pub failures_only: bool,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn mode(&self) -> DetectionMode {
        if self.failures_only {
            DetectionMode::FailuresOnly
        } else {
            DetectionMode::Full
        }
    }
}
