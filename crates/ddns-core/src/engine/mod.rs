//! Core DDNS engine
//!
//! The DdnsEngine runs one invocation from start to finish:
//! - Resolving the public IP once via IpSource
//! - Verifying the provider credential once
//! - Resolving zone, record and current content per record via DnsProvider
//! - Listing, or updating after confirmation
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────┐
//!                  │  DdnsEngine  │
//!                  └──────────────┘
//!                          │
//!      ┌───────────────────┼───────────────────┐
//!      │                   │                   │
//!      ▼                   ▼                   ▼
//! ┌──────────┐     ┌───────────────┐     ┌──────────┐
//! │ IpSource │     │  DnsProvider  │     │ Confirm  │
//! │ (once)   │     │ (per record)  │     │ (writes) │
//! └──────────┘     └───────────────┘     └──────────┘
//! ```
//!
//! ## Record Flow
//!
//! 1. Derive zone candidates, probe until the provider knows one
//!    (no zone: log and skip the record)
//! 2. Resolve the record ID (failure aborts the run)
//! 3. Read the current content (failure aborts the run)
//! 4. `list`: report. `update`: write if different and confirmed
//!    (write failure aborts the run)

use crate::config::{Command, DdnsConfig, RecordConfig};
use crate::credential::{Credential, VerifiedToken};
use crate::error::{Error, Result};
use crate::traits::{Confirm, DnsProvider, IpSource, NullSink, RecordRef, ReportSink};
use crate::zone::zone_candidates;
use tracing::{debug, error, info, warn};

/// What happened to a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// `list`: current content reported
    Listed {
        current_ip: String,
    },

    /// `update`: record already points at the public IP
    Unchanged {
        current_ip: String,
    },

    /// `update`: record rewritten
    Updated {
        previous_ip: String,
        new_ip: String,
    },

    /// `update`: write refused at the confirmation prompt
    Declined {
        current_ip: String,
    },

    /// No zone candidate is hosted by the provider; record skipped
    ZoneNotFound {
        candidates: Vec<String>,
    },
}

/// Result for one configured record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    /// Record name
    pub name: String,
    /// Zone the record was found in, if any
    pub zone: Option<String>,
    /// Outcome
    pub outcome: RecordOutcome,
}

/// Result of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Command that was executed
    pub command: Command,
    /// Public IP used as the desired record content
    pub public_ip: String,
    /// One entry per processed record, in configuration order
    pub records: Vec<RecordReport>,
}

impl RunReport {
    /// Number of records rewritten
    pub fn updated_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::Updated { .. }))
            .count()
    }

    /// Number of records skipped because no zone was found
    pub fn zone_miss_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::ZoneNotFound { .. }))
            .count()
    }
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`] (validates the configuration)
/// 2. Optionally attach a [`ReportSink`] with [`DdnsEngine::with_sink()`]
/// 3. Execute with [`DdnsEngine::run()`]
/// 4. Drop
///
/// ## Threading
///
/// All calls are awaited one after another: the public IP is resolved
/// once, then records are processed strictly in order. Nothing is shared
/// between records except the public IP and the verified token.
pub struct DdnsEngine {
    /// IP source for the desired record content
    ip_source: Box<dyn IpSource>,

    /// DNS provider; absent only for a record-less `list`
    provider: Option<Box<dyn DnsProvider>>,

    /// Gate consulted before each write
    confirm: Box<dyn Confirm>,

    /// Receives results as they are produced
    sink: Box<dyn ReportSink>,

    /// Invocation parameters
    config: DdnsConfig,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation (required when records are configured)
    /// - `confirm`: Confirmation gate for `update`
    /// - `config`: Invocation parameters
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)` if the configuration is incomplete. No I/O
    ///   has happened at that point.
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Option<Box<dyn DnsProvider>>,
        confirm: Box<dyn Confirm>,
        config: DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        if !config.records.is_empty() && provider.is_none() {
            return Err(Error::config("A DNS provider is required to process domains"));
        }

        Ok(Self {
            ip_source,
            provider,
            confirm,
            sink: Box::new(NullSink),
            config,
        })
    }

    /// Report results through `sink` while running
    ///
    /// Without a sink, results are only available from the returned
    /// [`RunReport`], which a fatal error discards.
    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run the configured command
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: Every record was either processed or skipped
    ///   because its zone was not found
    /// - `Err(Error)`: IP discovery, credential verification, record
    ///   resolution, content read or write failed
    pub async fn run(&self) -> Result<RunReport> {
        let public_ip = self.ip_source.current().await?;
        info!(
            "Public IP: {} (source: {})",
            public_ip,
            self.ip_source.source_name()
        );
        self.sink.public_ip(&public_ip);

        let mut report = RunReport {
            command: self.config.command,
            public_ip,
            records: Vec::with_capacity(self.config.records.len()),
        };

        let Some(provider) = self.provider.as_deref() else {
            return Ok(report);
        };
        if self.config.records.is_empty() {
            return Ok(report);
        }

        let credential = self
            .config
            .provider
            .credential
            .as_deref()
            .map(Credential::new)
            .ok_or_else(|| Error::config("No provider credential given"))?;

        let token = provider.verify_token(&credential).await?;
        info!("Credential verified with {}", provider.provider_name());

        for record in &self.config.records {
            let record_report = self
                .process_record(provider, &token, record, &report.public_ip)
                .await?;
            self.sink.record(&record_report);
            report.records.push(record_report);
        }

        Ok(report)
    }

    /// Process a single record
    async fn process_record(
        &self,
        provider: &dyn DnsProvider,
        token: &VerifiedToken,
        record: &RecordConfig,
        public_ip: &str,
    ) -> Result<RecordReport> {
        debug!("Processing {}", record);

        let candidates = zone_candidates(record);
        let Some((zone_name, zone_id)) = self.resolve_zone(provider, token, &candidates).await
        else {
            error!(
                "No zone found for {} (tried: {}), skipping",
                record.name,
                candidates.join(" ")
            );
            return Ok(RecordReport {
                name: record.name.clone(),
                zone: None,
                outcome: RecordOutcome::ZoneNotFound { candidates },
            });
        };

        let record_id = provider
            .get_domain_id(&zone_id, &record.name, token)
            .await?;

        let record_ref = RecordRef::new(zone_id, record_id);
        let current_ip = provider
            .get_domain_ip(&record_ref, token)
            .await?;

        let outcome = match self.config.command {
            Command::List => RecordOutcome::Listed { current_ip },
            Command::Update => {
                self.update_record(provider, token, record, &record_ref, current_ip, public_ip)
                    .await?
            }
        };

        Ok(RecordReport {
            name: record.name.clone(),
            zone: Some(zone_name),
            outcome,
        })
    }

    /// Probe zone candidates in order, returning the first the provider knows
    async fn resolve_zone(
        &self,
        provider: &dyn DnsProvider,
        token: &VerifiedToken,
        candidates: &[String],
    ) -> Option<(String, String)> {
        for candidate in candidates {
            match provider.get_zone_id(candidate, token).await {
                Ok(zone_id) => {
                    debug!("Zone {} has ID {}", candidate, zone_id);
                    return Some((candidate.clone(), zone_id));
                }
                Err(e) => {
                    debug!("Zone candidate {} rejected: {}", candidate, e);
                }
            }
        }
        None
    }

    /// Write the public IP to a record if it differs and the write is confirmed
    async fn update_record(
        &self,
        provider: &dyn DnsProvider,
        token: &VerifiedToken,
        record: &RecordConfig,
        record_ref: &RecordRef,
        current_ip: String,
        public_ip: &str,
    ) -> Result<RecordOutcome> {
        // Idempotency: no write when the record is already correct
        if current_ip == public_ip {
            info!("{} already points to {}", record.name, public_ip);
            return Ok(RecordOutcome::Unchanged { current_ip });
        }

        if !self.config.assume_yes {
            let question = format!(
                "Update {} from {} to {}?",
                record.name, current_ip, public_ip
            );
            if !self.confirm.confirm(&question) {
                warn!("Update of {} declined", record.name);
                return Ok(RecordOutcome::Declined { current_ip });
            }
        }

        provider
            .update_domain_ip(record_ref, public_ip, token)
            .await?;

        info!("Updated {}: {} -> {}", record.name, current_ip, public_ip);
        Ok(RecordOutcome::Updated {
            previous_ip: current_ip,
            new_ip: public_ip.to_string(),
        })
    }
}
