//! Provider lookup by identifier
//!
//! Maps the `-D` argument to a factory so the binary never matches on
//! provider names itself. Provider crates add themselves through a
//! `register()` function; the provider is built once per run:
//!
//! ```rust,ignore
//! let registry = ProviderRegistry::new();
//! ddns_provider_cloudflare::register(&registry);
//! let provider = registry.create_provider("cloudflare", http)?;
//! ```

use crate::error::{Error, Result};
use crate::http::HttpRequester;
use crate::traits::{DnsProvider, DnsProviderFactory};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Identifier to factory map
///
/// Registration takes `&self`. A poisoned lock is recovered, not propagated.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS provider factories
    providers: RwLock<HashMap<String, Box<dyn DnsProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider identifier (e.g., "cloudflare")
    /// - `factory`: Factory object for creating provider instances
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_provider(&self, name: impl Into<String>, factory: Box<dyn DnsProviderFactory>) {
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        providers.insert(name.into(), factory);
    }

    /// Create a DNS provider by identifier
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsProvider>)`: Created provider instance
    /// - `Err(Error::Config)`: If no provider is registered under `name`
    pub fn create_provider(
        &self,
        name: &str,
        http: Arc<dyn HttpRequester>,
    ) -> Result<Box<dyn DnsProvider>> {
        let created = {
            let providers = self
                .providers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            providers.get(name).map(|factory| factory.create(http))
        };

        created.unwrap_or_else(|| {
            Err(Error::config(format!(
                "Unknown provider type: {} (available: {})",
                name,
                self.list_providers().join(", ")
            )))
        })
    }

    /// List all registered provider identifiers, sorted
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider identifier is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }
}
