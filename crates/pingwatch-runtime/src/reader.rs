//! Comma-separated ping log reader.
//!
//! Fields may be enclosed in double quotes (`""` inside quotes is a literal
//! quote), so a quoted comma stays inside its field. Quoted fields cannot span
//! lines. Rows that do not have exactly three fields are skipped without error.

use std::path::Path;

use anyhow::Context;
use pingwatch_core::RawRecord;

/// Read and tokenize a log file.
pub fn read_log_file(path: &Path) -> anyhow::Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read log file {}", path.display()))?;
    let records = parse_log(&content);
    tracing::info!(path = %path.display(), records = records.len(), "read ping log");
    Ok(records)
}

/// Tokenize log content. Line indices are 0-based and count skipped rows too.
pub fn parse_log(content: &str) -> Vec<RawRecord> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        match <[String; 3]>::try_from(split_fields(line)) {
            Ok([timestamp, key, measurement]) => {
                records.push(RawRecord::new(idx, timestamp, key, measurement));
            }
            Err(fields) => {
                tracing::warn!(
                    line = idx + 1,
                    fields = fields.len(),
                    "skipping row without exactly 3 fields"
                );
            }
        }
    }
    records
}

/// Split one line on commas outside double quotes.
///
/// A quote only opens a quoted section at the start of a field; anywhere else
/// it is kept as a literal character.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
                continue;
            }
            '"' if at_field_start => in_quotes = true,
            _ => field.push(c),
        }
        at_field_start = false;
    }
    fields.push(field);
    fields
}
