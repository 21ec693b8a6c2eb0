// # HTTP Requester
//
// Single-shot HTTP calls shared by IP sources and DNS providers.
//
// ## Contract
//
// - One attempt per call, no retries
// - Connect timeout of 10 seconds
// - Status >= 400 is a failure carrying the raw response body
// - Transport failures carry the client's error text
//
// The `HttpRequester` trait is the seam between callers and the network:
// production code uses `ReqwestRequester`, tests script responses.

use async_trait::async_trait;
use std::time::Duration;

use crate::{Error, Result};

/// Connect timeout applied to every request
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request
const USER_AGENT: &str = concat!("ddns/", env!("CARGO_PKG_VERSION"));

/// HTTP methods used by the updater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Patch,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Patch => f.write_str("PATCH"),
        }
    }
}

/// A single HTTP request
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    /// Request method
    pub method: HttpMethod,
    /// Absolute URL
    pub url: String,
    /// Bearer token sent in the `Authorization` header
    ///
    /// ⚠️ NEVER log this value
    pub bearer: Option<String>,
    /// JSON body
    pub body: Option<serde_json::Value>,
}

// Custom Debug implementation that hides the bearer token
impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("bearer", &self.bearer.as_ref().map(|_| "<REDACTED>"))
            .field("body", &self.body)
            .finish()
    }
}

impl HttpRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            bearer: None,
            body: None,
        }
    }

    /// Create a PATCH request with a JSON body
    pub fn patch(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Patch,
            url: url.into(),
            bearer: None,
            body: Some(body),
        }
    }

    /// Attach a bearer token
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Trait for performing HTTP requests
///
/// Implementations perform exactly one network call per invocation and
/// return the response body. Callers decide what to do with failures.
#[async_trait]
pub trait HttpRequester: Send + Sync {
    /// Perform the request and return the response body
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Body of a response with status < 400
    /// - `Err(Error::HttpStatus)`: Status >= 400, with the raw body
    /// - `Err(Error::Http)`: Transport failure
    async fn send(&self, request: HttpRequest) -> Result<String>;
}

/// `reqwest`-backed requester
#[derive(Debug, Clone)]
pub struct ReqwestRequester {
    client: reqwest::Client,
}

impl ReqwestRequester {
    /// Build the requester
    ///
    /// Failing to initialise the HTTP client (e.g. no TLS backend available)
    /// is reported as a dependency error.
    pub fn new() -> Result<Self> {
        Self::from_builder(client_builder())
    }

    fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self> {
        let client = builder
            .build()
            .map_err(|e| Error::dependency(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(USER_AGENT)
}

#[async_trait]
impl HttpRequester for ReqwestRequester {
    async fn send(&self, request: HttpRequest) -> Result<String> {
        tracing::debug!("{} {}", request.method, request.url);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Patch => self.client.patch(&request.url),
        };

        if let Some(ref token) = request.bearer {
            builder = builder.bearer_auth(token);
        }

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(format!("{} {} failed: {}", request.method, request.url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if status.as_u16() >= 400 {
            tracing::debug!("{} {} -> {}", request.method, request.url, status);
            return Err(Error::http_status(status.as_u16(), body));
        }

        Ok(body)
    }
}
