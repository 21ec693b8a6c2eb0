// # DNS Provider Trait
//
// Defines the interface for reading and updating DNS records via provider APIs.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Call flow
//
// ```text
// verify_token ──> get_zone_id ──> get_domain_id ──> get_domain_ip
//                                                └──> update_domain_ip
// ```
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
// use ddns_core::credential::Credential;
// use ddns_core::traits::RecordRef;
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let token = provider.verify_token(&Credential::new("token")).await?;
//     let zone_id = provider.get_zone_id("example.com", &token).await?;
//     let record_id = provider.get_domain_id(&zone_id, "my.example.com", &token).await?;
//     let record = RecordRef::new(zone_id, record_id);
//     let current = provider.get_domain_ip(&record, &token).await?;
//     if current != "192.0.2.1" {
//         provider.update_domain_ip(&record, "192.0.2.1", &token).await?;
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::credential::{Credential, VerifiedToken};

/// Provider-assigned identity of a single DNS record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    /// Zone ID (provider-specific)
    pub zone_id: String,
    /// Record ID within the zone (provider-specific)
    pub record_id: String,
}

impl RecordRef {
    pub fn new(zone_id: impl Into<String>, record_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            record_id: record_id.into(),
        }
    }
}

/// Trait for DNS provider implementations
///
/// Each method maps to one logical provider call and returns a single opaque
/// value or an error. Implementations must handle the specifics of each
/// provider's API.
///
/// # Rules
///
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure, loudly
/// - ❌ Retry or back off (a failed call is a failed operation)
/// - ❌ Fall back to a default when a lookup misses
/// - ❌ Decide whether an update is needed (owned by `DdnsEngine`)
/// - ❌ Cache state beyond a single call
///
/// # Matching
///
/// Zone and record names are matched exactly, byte for byte. No wildcard,
/// case-insensitive or substring matching.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Resolve and verify a credential
    ///
    /// # Returns
    ///
    /// - `Ok(VerifiedToken)`: The provider confirmed the token as valid
    /// - `Err(Error)`: Verification failed; the error carries the raw response
    async fn verify_token(&self, credential: &Credential) -> Result<VerifiedToken, crate::Error>;

    /// Find the ID of the zone named exactly `zone_name`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The zone ID
    /// - `Err(Error::NotFound)`: No zone visible to the token has that name
    async fn get_zone_id(
        &self,
        zone_name: &str,
        token: &VerifiedToken,
    ) -> Result<String, crate::Error>;

    /// Find the ID of the record named exactly `domain_name` in a zone
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The record ID
    /// - `Err(Error::NotFound)`: The zone holds no record with that name
    async fn get_domain_id(
        &self,
        zone_id: &str,
        domain_name: &str,
        token: &VerifiedToken,
    ) -> Result<String, crate::Error>;

    /// Read a record's current content
    async fn get_domain_ip(
        &self,
        record: &RecordRef,
        token: &VerifiedToken,
    ) -> Result<String, crate::Error>;

    /// Set a record's content to `new_ip`
    ///
    /// Issues a partial update; other record fields are left untouched.
    async fn update_domain_ip(
        &self,
        record: &RecordRef,
        new_ip: &str,
        token: &VerifiedToken,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "cloudflare")
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance
    ///
    /// # Parameters
    ///
    /// - `http`: Requester the provider sends its API calls through
    ///
    /// # Returns
    ///
    /// A boxed DnsProvider trait object
    fn create(
        &self,
        http: std::sync::Arc<dyn crate::http::HttpRequester>,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
