//! Test doubles and common utilities for engine contract tests
//!
//! The doubles record every call so tests can assert on what the engine
//! did (and did not do) without any network access.

#![allow(dead_code)]

use ddns_core::config::{Command, DdnsConfig, ProviderConfig, RecordConfig};
use ddns_core::credential::{Credential, VerifiedToken};
use ddns_core::engine::RecordReport;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{Confirm, DnsProvider, IpSource, RecordRef, ReportSink};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "test-token";
pub const PUBLIC_IP: &str = "203.0.113.10";
pub const OLD_IP: &str = "198.51.100.4";

/// An IpSource returning a fixed address and counting calls
pub struct CountingIpSource {
    ip: String,
    calls: Arc<AtomicUsize>,
}

impl CountingIpSource {
    pub fn new(ip: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            ip: ip.to_string(),
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }
}

#[async_trait::async_trait]
impl IpSource for CountingIpSource {
    async fn current(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip.clone())
    }

    fn source_name(&self) -> &'static str {
        "counting"
    }
}

/// An IpSource that always fails
pub struct FailingIpSource;

#[async_trait::async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<String> {
        Err(Error::ip_source("all reflectors failed"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// A provider call, as observed by [`MockDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    VerifyToken(String),
    GetZoneId(String),
    GetDomainId { zone_id: String, name: String },
    GetDomainIp(RecordRef),
    UpdateDomainIp(RecordRef, String),
}

/// Shared view of the calls a [`MockDnsProvider`] received
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<ProviderCall>>>);

impl CallLog {
    fn push(&self, call: ProviderCall) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }

    pub fn writes(&self) -> Vec<(RecordRef, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::UpdateDomainIp(record, ip) => Some((record, ip)),
                _ => None,
            })
            .collect()
    }

    pub fn zone_probes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::GetZoneId(zone) => Some(zone),
                _ => None,
            })
            .collect()
    }
}

struct MockRecord {
    zone_id: String,
    name: String,
    id: String,
    content: Mutex<String>,
}

/// An in-memory DnsProvider that tracks calls
pub struct MockDnsProvider {
    token: String,
    zones: Vec<(String, String)>,
    records: Vec<MockRecord>,
    log: CallLog,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            token: TOKEN.to_string(),
            zones: Vec::new(),
            records: Vec::new(),
            log: CallLog::default(),
        }
    }

    /// Host a zone with the given ID
    pub fn with_zone(mut self, name: &str, id: &str) -> Self {
        self.zones.push((name.to_string(), id.to_string()));
        self
    }

    /// Add a record to a hosted zone
    pub fn with_record(mut self, zone_id: &str, name: &str, id: &str, content: &str) -> Self {
        self.records.push(MockRecord {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
            id: id.to_string(),
            content: Mutex::new(content.to_string()),
        });
        self
    }

    /// Handle on the call log, valid after the provider is boxed
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    fn find(&self, record: &RecordRef) -> Result<&MockRecord> {
        self.records
            .iter()
            .find(|r| r.zone_id == record.zone_id && r.id == record.record_id)
            .ok_or_else(|| Error::not_found(format!("record {}", record.record_id)))
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn verify_token(&self, credential: &Credential) -> Result<VerifiedToken> {
        let token = credential.resolve()?;
        self.log.push(ProviderCall::VerifyToken(token.clone()));
        if token != self.token {
            return Err(Error::auth(r#"{"success":false}"#));
        }
        Ok(VerifiedToken::new(token))
    }

    async fn get_zone_id(&self, zone_name: &str, _token: &VerifiedToken) -> Result<String> {
        self.log.push(ProviderCall::GetZoneId(zone_name.to_string()));
        self.zones
            .iter()
            .find(|(name, _)| name == zone_name)
            .map(|(_, id)| id.clone())
            .ok_or_else(|| Error::not_found(format!("zone {}", zone_name)))
    }

    async fn get_domain_id(
        &self,
        zone_id: &str,
        domain_name: &str,
        _token: &VerifiedToken,
    ) -> Result<String> {
        self.log.push(ProviderCall::GetDomainId {
            zone_id: zone_id.to_string(),
            name: domain_name.to_string(),
        });
        self.records
            .iter()
            .find(|r| r.zone_id == zone_id && r.name == domain_name)
            .map(|r| r.id.clone())
            .ok_or_else(|| Error::not_found(format!("DNS record not found: {}", domain_name)))
    }

    async fn get_domain_ip(&self, record: &RecordRef, _token: &VerifiedToken) -> Result<String> {
        self.log.push(ProviderCall::GetDomainIp(record.clone()));
        Ok(self.find(record)?.content.lock().unwrap().clone())
    }

    async fn update_domain_ip(
        &self,
        record: &RecordRef,
        new_ip: &str,
        _token: &VerifiedToken,
    ) -> Result<()> {
        self.log
            .push(ProviderCall::UpdateDomainIp(record.clone(), new_ip.to_string()));
        *self.find(record)?.content.lock().unwrap() = new_ip.to_string();
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A Confirm double replaying scripted answers and recording questions
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    questions: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirm {
    /// Answers are consumed in order; once exhausted every answer is "no"
    pub fn new(answers: &[bool]) -> (Self, Arc<Mutex<Vec<String>>>) {
        let questions = Arc::new(Mutex::new(Vec::new()));
        let confirm = Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            questions: Arc::clone(&questions),
        };
        (confirm, questions)
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

/// Provider hosting `example.com` (zone id `z1`) with two records
///
/// - `my.example.com` (id `r1`) holding `content`
/// - `other.example.com` (id `r2`) holding `content`
pub fn example_provider(content: &str) -> MockDnsProvider {
    MockDnsProvider::new()
        .with_zone("example.com", "z1")
        .with_record("z1", "my.example.com", "r1", content)
        .with_record("z1", "other.example.com", "r2", content)
}

/// Helper to create a configuration for the given command and domains
pub fn config(command: Command, domains: &[&str]) -> DdnsConfig {
    DdnsConfig {
        command,
        provider: ProviderConfig::new("mock", TOKEN),
        records: domains.iter().map(|d| RecordConfig::parse(d)).collect(),
        ..DdnsConfig::default()
    }
}

/// A ReportSink keeping everything it receives, shared across clones
#[derive(Clone, Default)]
pub struct RecordingSink {
    public_ips: Arc<Mutex<Vec<String>>>,
    records: Arc<Mutex<Vec<RecordReport>>>,
}

impl RecordingSink {
    pub fn public_ips(&self) -> Vec<String> {
        self.public_ips.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<RecordReport> {
        self.records.lock().unwrap().clone()
    }
}

impl ReportSink for RecordingSink {
    fn public_ip(&self, ip: &str) {
        self.public_ips.lock().unwrap().push(ip.to_string());
    }

    fn record(&self, report: &RecordReport) {
        self.records.lock().unwrap().push(report.clone());
    }
}
