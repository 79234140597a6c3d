//! pingwatch: failure and high-load period report for a ping monitoring log.

use std::io::Write;

use clap::Parser;
use pingwatch_core::{DetectionParams, Report, ScanError, analyze};

mod cli;
mod reader;
mod render;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("PINGWATCH_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Malformed input is reported as a one-line diagnostic, not a failure exit.
    let report = match detect(&args) {
        Ok(report) => report,
        Err(err) => match err.downcast::<ScanError>() {
            Ok(scan_err) => {
                tracing::debug!(error = %scan_err, "detection aborted");
                println!("{scan_err}");
                return Ok(());
            }
            Err(other) => return Err(other),
        },
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        render::write_json(&mut out, &report)?;
    } else {
        render::write_text(&mut out, &report)?;
    }
    out.flush()?;
    Ok(())
}

/// Validate parameters, read the log and run the detection passes.
fn detect(args: &cli::Cli) -> anyhow::Result<Report> {
    let params = DetectionParams::new(args.continuous_timeout, args.window, args.threshold)?;
    let mode = args.mode();
    tracing::info!(?params, ?mode, log_file = %args.log_file.display(), "pingwatch starting");

    let records = reader::read_log_file(&args.log_file)?;
    let report = analyze(&records, &params, mode)?;

    tracing::info!(
        hosts = report.failures_by_host.len(),
        "detection finished"
    );
    Ok(report)
}
