// Plain-text results on stdout, one line per event as the run progresses.

use ddns_core::{RecordOutcome, RecordReport, ReportSink};
use std::io::{self, Write};

/// Prints each result line as soon as the engine produces it
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn public_ip(&self, ip: &str) {
        emit(&render_public_ip(ip));
    }

    fn record(&self, report: &RecordReport) {
        emit(&render_record(report));
    }
}

/// Write and flush one line; a closed stdout is logged, not propagated
fn emit(line: &str) {
    let mut stdout = io::stdout().lock();
    if writeln!(stdout, "{}", line).and_then(|_| stdout.flush()).is_err() {
        tracing::debug!("stdout closed, dropped: {}", line);
    }
}

pub fn render_public_ip(ip: &str) -> String {
    format!("public ip: {}", ip)
}

pub fn render_record(record: &RecordReport) -> String {
    let name = match record.zone {
        Some(ref zone) => format!("{} [{}]", record.name, zone),
        None => record.name.clone(),
    };

    match record.outcome {
        RecordOutcome::Listed { ref current_ip } => format!("{}: {}", name, current_ip),
        RecordOutcome::Unchanged { ref current_ip } => {
            format!("{}: {} (up to date)", name, current_ip)
        }
        RecordOutcome::Updated {
            ref previous_ip,
            ref new_ip,
        } => format!("{}: {} -> {} (updated)", name, previous_ip, new_ip),
        RecordOutcome::Declined { ref current_ip } => {
            format!("{}: {} (skipped)", name, current_ip)
        }
        RecordOutcome::ZoneNotFound { ref candidates } => {
            format!("{}: no zone found (tried {})", name, candidates.join(" "))
        }
    }
}
