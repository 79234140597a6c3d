//! Human-readable rendering of interval timestamps and elapsed time.

use chrono::{NaiveDateTime, TimeDelta};

/// Rendered in place of an end timestamp when the run had not ended.
pub const ONGOING: &str = "ongoing";

/// Appended to every rendered elapsed time.
pub const ELAPSED_SUFFIX: &str = "elapsed";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Render an elapsed time as `1d2h3m4s elapsed`.
///
/// Zero units are left out wherever they occur, so one day and five minutes
/// renders as `1d5m elapsed`. A zero delta renders as the bare suffix.
pub fn format_elapsed(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    let days = total.div_euclid(86_400);
    let rem = total.rem_euclid(86_400);
    let hours = rem / 3_600;
    let mins = rem / 60 % 60;
    let secs = rem % 60;

    let mut out = String::new();
    for (value, unit) in [(days, 'd'), (hours, 'h'), (mins, 'm'), (secs, 's')] {
        if value != 0 {
            out.push_str(&format!("{value}{unit}"));
        }
    }
    if out.is_empty() {
        ELAPSED_SUFFIX.to_string()
    } else {
        format!("{out} {ELAPSED_SUFFIX}")
    }
}
