// # IP Source Trait
//
// Defines the interface for discovering the host's public IP address.
//
// ## Implementations
//
// - Reflector-based: `ddns-ip-http` crate
// - Fixed address (the `-i` override): `ddns_core::source::FixedIpSource`
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let public_ip = source.current().await?;
//     println!("Public IP: {}", public_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// An IP source answers one question per invocation: what is the address
/// the DNS record should point to?
///
/// # Rules
///
/// - ✅ Perform I/O needed to discover the address (HTTP reflectors)
/// - ✅ Try alternatives in order (e.g. a reflector list)
/// - ❌ Talk to DNS providers (use `DnsProvider`)
/// - ❌ Decide whether a record needs updating (owned by `DdnsEngine`)
/// - ❌ Cache results across invocations
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    ///
    /// The address is returned as text, exactly as the source reported it
    /// (surrounding whitespace removed). No format validation is performed.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The current public IP address
    /// - `Err(Error)`: If no address could be determined
    async fn current(&self) -> Result<String, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
