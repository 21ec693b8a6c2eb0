//! Core traits for the DDNS updater
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the public IP address
//! - [`DnsProvider`]: Read and update DNS records via provider APIs
//! - [`Confirm`]: Gate record writes behind a yes/no answer
//! - [`ReportSink`]: Receive results as each record is processed

pub mod ip_source;
pub mod dns_provider;
pub mod confirm;
pub mod report_sink;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsProviderFactory, RecordRef};
pub use confirm::{Confirm, FixedAnswer};
pub use report_sink::{NullSink, ReportSink};
