// # Fixed IP Source
//
// IpSource that always reports the same, caller-supplied address.
//
// ## Purpose
//
// Backs the `-i <addr>` override: discovery is skipped entirely and the
// given address is used for every record. No network I/O happens.

use async_trait::async_trait;

use crate::traits::IpSource;
use crate::{Error, Result};

/// IP source returning a fixed address
///
/// # Example
///
/// ```rust
/// use ddns_core::source::FixedIpSource;
/// use ddns_core::traits::IpSource;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let source = FixedIpSource::new("192.0.2.7");
/// assert_eq!(source.current().await.unwrap(), "192.0.2.7");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct FixedIpSource {
    address: String,
}

impl FixedIpSource {
    /// Create a source for `address`
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into().trim().to_string(),
        }
    }
}

#[async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<String> {
        if self.address.is_empty() {
            return Err(Error::ip_source("Fixed IP address is empty"));
        }
        tracing::debug!("Using fixed IP {}", self.address);
        Ok(self.address.clone())
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}
