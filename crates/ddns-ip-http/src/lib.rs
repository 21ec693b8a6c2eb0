// # HTTP IP Source
//
// This crate discovers the host's public IP address by asking external
// "reflector" services that echo the caller's address back as plain text.
//
// ## Behaviour
//
// - Reflectors are tried strictly in order, one request at a time
// - The first successful, non-empty body is the answer
// - The body is taken verbatim (whitespace trimmed), without IP validation
// - When every reflector fails, the error names the exhausted list
//
// ## Reflector sets
//
// | version | reflectors                                   |
// |---------|----------------------------------------------|
// | v4      | api.ipify.org, ipv4.icanhazip.com, v4.ident.me |
// | v6      | api6.ipify.org, ipv6.icanhazip.com, v6.ident.me |
// | both    | the v6 set, then the v4 set                  |

use async_trait::async_trait;
use ddns_core::config::{IpConfig, IpVersion};
use ddns_core::http::{HttpRequest, HttpRequester};
use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::sync::Arc;

/// Default IPv4 reflectors
pub const DEFAULT_IPV4_REFLECTORS: &[&str] = &[
    "https://api.ipify.org",
    "https://ipv4.icanhazip.com",
    "https://v4.ident.me",
];

/// Default IPv6 reflectors
pub const DEFAULT_IPV6_REFLECTORS: &[&str] = &[
    "https://api6.ipify.org",
    "https://ipv6.icanhazip.com",
    "https://v6.ident.me",
];

/// Built-in reflector list for an IP version
pub fn default_reflectors(version: IpVersion) -> Vec<String> {
    let sets: &[&[&str]] = match version {
        IpVersion::V4 => &[DEFAULT_IPV4_REFLECTORS],
        IpVersion::V6 => &[DEFAULT_IPV6_REFLECTORS],
        IpVersion::Both => &[DEFAULT_IPV6_REFLECTORS, DEFAULT_IPV4_REFLECTORS],
    };

    sets.iter()
        .flat_map(|set| set.iter())
        .map(|url| url.to_string())
        .collect()
}

/// Reflector-based IP source
pub struct HttpIpSource {
    /// Reflector URLs, tried in order
    reflectors: Vec<String>,

    /// HTTP requester
    http: Arc<dyn HttpRequester>,
}

impl std::fmt::Debug for HttpIpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIpSource")
            .field("reflectors", &self.reflectors)
            .finish()
    }
}

impl HttpIpSource {
    /// Create a source querying `reflectors` in order
    pub fn new(reflectors: Vec<String>, http: Arc<dyn HttpRequester>) -> Self {
        Self { reflectors, http }
    }

    /// Create a source with the built-in reflectors for `version`
    pub fn for_version(version: IpVersion, http: Arc<dyn HttpRequester>) -> Self {
        Self::new(default_reflectors(version), http)
    }

    /// Create a source from configuration
    ///
    /// A non-empty override list replaces the built-in reflectors.
    pub fn from_config(config: &IpConfig, http: Arc<dyn HttpRequester>) -> Self {
        if config.reflectors.is_empty() {
            Self::for_version(config.version, http)
        } else {
            Self::new(config.reflectors.clone(), http)
        }
    }

    /// Reflectors this source will query
    pub fn reflectors(&self) -> &[String] {
        &self.reflectors
    }

    /// Fetch the address from a single reflector
    async fn fetch_ip(&self, url: &str) -> Result<String> {
        let body = self.http.send(HttpRequest::get(url)).await?;
        let ip = body.trim();

        if ip.is_empty() {
            return Err(Error::ip_source(format!("{} returned an empty body", url)));
        }

        Ok(ip.to_string())
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        for url in &self.reflectors {
            match self.fetch_ip(url).await {
                Ok(ip) => {
                    tracing::debug!("{} reported {}", url, ip);
                    return Ok(ip);
                }
                Err(e) => {
                    tracing::warn!("Reflector {} failed: {}", url, e);
                }
            }
        }

        Err(Error::ip_source(format!(
            "Could not determine public IP, all reflectors failed: {}",
            self.reflectors.join(" ")
        )))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
