//! Error types for the DDNS updater
//!
//! Every fallible operation in the workspace returns [`Result`]. The variants
//! follow the failure classes the binary reports: dependency, usage/config,
//! transport, resolution miss and credential verification.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// A linked runtime dependency (the HTTP client) could not be initialised
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// Invalid or incomplete invocation parameters
    #[error("Configuration error: {0}")]
    Config(String),

    /// Public IP discovery errors
    #[error("IP source error: {0}")]
    IpSource(String),

    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a status code >= 400
    ///
    /// `body` is the raw response text, surfaced unchanged.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Credential verification failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Zone or record not found by exact-match scan
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local I/O errors (token files, terminal)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a dependency error
    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::Dependency(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an HTTP status error carrying the raw body
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error stems from missing or invalid invocation parameters
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
