//! Report rendering: tab-separated text tables and JSON.

use std::io::{self, Write};

use pingwatch_core::{Interval, KeyedSeries, ONGOING, Report, format_timestamp};

/// Column labels for one detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Failure,
    HighLoad,
}

impl PeriodKind {
    fn labels(self) -> (&'static str, &'static str) {
        match self {
            PeriodKind::Failure => ("failure start", "failure end"),
            PeriodKind::HighLoad => ("high load start", "high load end"),
        }
    }
}

/// Write every pass of the report as text tables.
pub fn write_text(out: &mut impl Write, report: &Report) -> io::Result<()> {
    write_periods(out, "IP", PeriodKind::Failure, &report.failures_by_host)?;
    if let Some(highload) = &report.highload_by_host {
        // Nothing at all to show (no hosts) drops the whole section.
        if !highload.is_empty() {
            write_periods(out, "IP", PeriodKind::HighLoad, highload)?;
        }
    }
    if let Some(by_network) = &report.failures_by_network {
        write_periods(out, "NetAddress", PeriodKind::Failure, by_network)?;
    }
    Ok(())
}

/// Header, then each group that has intervals followed by one line per interval.
pub fn write_periods(
    out: &mut impl Write,
    group_name: &str,
    kind: PeriodKind,
    periods: &KeyedSeries<Interval>,
) -> io::Result<()> {
    let (start_label, end_label) = kind.labels();
    writeln!(out, "{group_name}\t\t{start_label}\t\t\t{end_label}\t\t\tduration")?;
    for (key, intervals) in periods {
        if intervals.is_empty() {
            continue;
        }
        writeln!(out, "{key}")?;
        for interval in intervals {
            writeln!(out, "\t\t{}", interval_line(interval))?;
        }
    }
    Ok(())
}

fn interval_line(interval: &Interval) -> String {
    let end = interval
        .end
        .map(format_timestamp)
        .unwrap_or_else(|| ONGOING.to_string());
    format!(
        "{}\t{}\t{}",
        format_timestamp(interval.start),
        end,
        interval.duration
    )
}

pub fn write_json(out: &mut impl Write, report: &Report) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
