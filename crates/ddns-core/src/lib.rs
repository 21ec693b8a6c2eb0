// # ddns-core
//
// Core library for the one-shot DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpSource**: Trait for discovering the public IP address
// - **DnsProvider**: Trait for the verify/zone/record/read/update provider calls
// - **HttpRequester**: Single-shot HTTP seam shared by sources and providers
// - **DdnsEngine**: Runs one `list` or `update` invocation
// - **ProviderRegistry**: Plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Sequential**: One request at a time, records processed in order
// 3. **Plugin-Based**: Providers are registered by name, no hard-coded if-else
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Idempotency**: A record already holding the public IP is never rewritten

pub mod traits;
pub mod engine;
pub mod registry;
pub mod config;
pub mod credential;
pub mod error;
pub mod http;
pub mod source;
pub mod zone;

// Re-export core types for convenience
pub use traits::{Confirm, DnsProvider, IpSource, ReportSink};
pub use engine::{DdnsEngine, RecordOutcome, RecordReport, RunReport};
pub use registry::ProviderRegistry;
pub use config::{Command, DdnsConfig, IpConfig, IpVersion, ProviderConfig, RecordConfig};
pub use credential::{Credential, VerifiedToken};
pub use error::{Error, Result};
pub use http::{HttpRequester, ReqwestRequester};
pub use source::FixedIpSource;
