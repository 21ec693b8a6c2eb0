//! Zone candidate derivation
//!
//! Providers manage records inside zones, and a zone is usually the
//! registrable domain rather than the record's immediate parent. Candidates
//! are produced most specific first so the caller can stop at the first zone
//! the provider recognizes:
//!
//! ```text
//! my.example.com  ->  my.example.com, example.com, com
//! ```
//!
//! A record given as `zone:fqdn` has exactly one candidate, the zone.

use crate::config::RecordConfig;

/// Ordered zone candidates for a record
pub fn zone_candidates(record: &RecordConfig) -> Vec<String> {
    match record.zone {
        Some(ref zone) => vec![zone.clone()],
        None => domain_suffixes(&record.name),
    }
}

/// Every label suffix of `domain`, from the domain itself down to its TLD
pub fn domain_suffixes(domain: &str) -> Vec<String> {
    let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();

    (0..labels.len()).map(|i| labels[i..].join(".")).collect()
}
