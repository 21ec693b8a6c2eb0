// # Report Sink Trait
//
// Receives run results in processing order, each record as soon as it is
// done. Records reported before a fatal error stay reported.

use crate::engine::RecordReport;

/// Consumer of per-run results, called in processing order
pub trait ReportSink: Send + Sync {
    /// The public IP was resolved
    fn public_ip(&self, ip: &str);

    /// A record finished processing (including zone-miss skips)
    fn record(&self, report: &RecordReport);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn public_ip(&self, _ip: &str) {}

    fn record(&self, _report: &RecordReport) {}
}
