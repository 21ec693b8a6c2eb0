// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare DNS provider implementation for the DDNS updater.
//
// ## Behaviour
//
// - One HTTP request per logical call (list endpoints: one per page)
// - No retry, no backoff, no caching
// - Zone and record names matched exactly, byte for byte
// - Failures carry the raw Cloudflare response text
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - The token travels only in the `Authorization: Bearer` header
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Verify Token: GET `/user/tokens/verify`
// - List Zones: GET `/zones?per_page=50&page=N`
// - List DNS Records: GET `/zones/:zone_id/dns_records?per_page=100&page=N`
// - DNS Record Details: GET `/zones/:zone_id/dns_records/:record_id`
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use ddns_core::credential::{Credential, VerifiedToken};
use ddns_core::http::{HttpRequest, HttpRequester};
use ddns_core::traits::{DnsProvider, DnsProviderFactory, RecordRef};
use ddns_core::{Error, ProviderRegistry, Result};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Provider identifier used for registration
pub const PROVIDER_NAME: &str = "cloudflare";

/// Page size for zone listings
const ZONES_PER_PAGE: u32 = 50;

/// Page size for DNS record listings
const RECORDS_PER_PAGE: u32 = 100;

/// Envelope of Cloudflare list endpoints
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Vec<NamedObject>,
    result_info: Option<ResultInfo>,
}

/// Zone or DNS record, reduced to the fields used for matching
#[derive(Debug, Deserialize)]
struct NamedObject {
    id: String,
    name: String,
    /// Record type (`A`, `AAAA`, ...); absent on zones
    #[serde(rename = "type", default)]
    record_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    total_pages: u32,
}

/// Cloudflare DNS provider
///
/// Stateless: every call goes straight to the API through the configured
/// [`HttpRequester`]. The verified token is passed in per call.
pub struct CloudflareProvider {
    /// HTTP requester for API calls
    http: Arc<dyn HttpRequester>,

    /// API base URL without trailing slash
    api_base: String,
}

impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider talking to the public Cloudflare API
    pub fn new(http: Arc<dyn HttpRequester>) -> Self {
        Self::with_api_base(http, CLOUDFLARE_API_BASE)
    }

    /// Create a provider talking to a different API base (e.g. a test server)
    pub fn with_api_base(http: Arc<dyn HttpRequester>, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { http, api_base }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// GET a URL with the token and decode the JSON body
    async fn get_json(&self, url: String, token: &VerifiedToken) -> Result<Value> {
        let body = self
            .http
            .send(HttpRequest::get(url).bearer(token.secret()))
            .await?;

        decode(&body)
    }

    /// Walk a paginated list endpoint looking for an exact name match
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: ID of the first object named exactly `name`
    /// - `Err(Error::NotFound)`: No page contains such an object
    async fn find_id_by_name(
        &self,
        path: &str,
        per_page: u32,
        name: &str,
        kind: &str,
        token: &VerifiedToken,
    ) -> Result<String> {
        let mut page = 1;

        loop {
            let url = self.url(&format!("{}?per_page={}&page={}", path, per_page, page));
            let body = self
                .http
                .send(HttpRequest::get(url).bearer(token.secret()))
                .await?;

            let list: ListResponse = serde_json::from_str(&body).map_err(|e| {
                Error::provider(PROVIDER_NAME, format!("Failed to parse {} list: {}", kind, e))
            })?;

            if !list.success {
                return Err(Error::provider(PROVIDER_NAME, body));
            }

            if let Some(found) = list.result.into_iter().find(|o| o.name == name) {
                match found.record_type {
                    Some(ref record_type) => tracing::debug!(
                        "Found {} {} (type {}, id {}, page {})",
                        kind,
                        name,
                        record_type,
                        found.id,
                        page
                    ),
                    None => tracing::debug!("Found {} {} (id {}, page {})", kind, name, found.id, page),
                }
                return Ok(found.id);
            }

            let total_pages = list.result_info.map_or(1, |info| info.total_pages);
            if page >= total_pages {
                break;
            }
            page += 1;
        }

        Err(Error::not_found(format!("{} not found: {}", kind, name)))
    }
}

/// Decode a JSON response body
fn decode(body: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e)))
}

/// Check the `success` flag of a Cloudflare response
fn is_success(json: &Value) -> bool {
    json["success"].as_bool() == Some(true)
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Verify the token against `/user/tokens/verify`
    ///
    /// Any failure, including a 4xx status, is reported as an authentication
    /// error carrying the raw response.
    async fn verify_token(&self, credential: &Credential) -> Result<VerifiedToken> {
        let token = credential.resolve()?;

        let request = HttpRequest::get(self.url("/user/tokens/verify")).bearer(token.as_str());
        let body = match self.http.send(request).await {
            Ok(body) => body,
            Err(Error::HttpStatus { body, .. }) => return Err(Error::auth(body)),
            Err(e) => return Err(e),
        };

        let json: Value = serde_json::from_str(&body).map_err(|_| Error::auth(body.clone()))?;
        if !is_success(&json) {
            return Err(Error::auth(body));
        }

        tracing::debug!("Cloudflare token verified");
        Ok(VerifiedToken::new(token))
    }

    async fn get_zone_id(&self, zone_name: &str, token: &VerifiedToken) -> Result<String> {
        tracing::debug!("Looking up zone ID for {}", zone_name);
        self.find_id_by_name("/zones", ZONES_PER_PAGE, zone_name, "Zone", token)
            .await
    }

    async fn get_domain_id(
        &self,
        zone_id: &str,
        domain_name: &str,
        token: &VerifiedToken,
    ) -> Result<String> {
        tracing::debug!("Looking up record ID for {} in zone {}", domain_name, zone_id);
        let path = format!("/zones/{}/dns_records", zone_id);
        self.find_id_by_name(&path, RECORDS_PER_PAGE, domain_name, "DNS record", token)
            .await
    }

    async fn get_domain_ip(&self, record: &RecordRef, token: &VerifiedToken) -> Result<String> {
        let url = self.url(&format!(
            "/zones/{}/dns_records/{}",
            record.zone_id, record.record_id
        ));
        let json = self.get_json(url, token).await?;

        json["result"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                Error::provider(
                    PROVIDER_NAME,
                    format!("Invalid response format: content is not a string: {}", json),
                )
            })
    }

    async fn update_domain_ip(
        &self,
        record: &RecordRef,
        new_ip: &str,
        token: &VerifiedToken,
    ) -> Result<()> {
        let url = self.url(&format!(
            "/zones/{}/dns_records/{}",
            record.zone_id, record.record_id
        ));
        let payload = serde_json::json!({ "content": new_ip });

        tracing::debug!("PATCH {} content={}", url, new_ip);
        let body = self
            .http
            .send(HttpRequest::patch(url, payload).bearer(token.secret()))
            .await?;

        if !is_success(&decode(&body)?) {
            return Err(Error::provider(PROVIDER_NAME, body));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, http: Arc<dyn HttpRequester>) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(CloudflareProvider::new(http)))
    }
}

/// Register the Cloudflare provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// ddns_provider_cloudflare::register(&registry);
/// assert!(registry.has_provider("cloudflare"));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(CloudflareFactory));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddns_core::http::HttpMethod;
    use serde_json::json;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;

    const BASE: &str = "https://cf.test/client/v4";

    /// Requester answering from a (method, URL) table, recording requests
    #[derive(Default)]
    struct ScriptedRequester {
        responses: HashMap<(HttpMethod, String), (u16, String)>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedRequester {
        fn on(mut self, method: HttpMethod, path: &str, status: u16, body: Value) -> Self {
            self.responses
                .insert((method, format!("{}{}", BASE, path)), (status, body.to_string()));
            self
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpRequester for ScriptedRequester {
        async fn send(&self, request: HttpRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            match self.responses.get(&(request.method, request.url.clone())) {
                Some((status, body)) if *status >= 400 => {
                    Err(Error::http_status(*status, body.clone()))
                }
                Some((_, body)) => Ok(body.clone()),
                None => Err(Error::http(format!("unexpected request: {}", request.url))),
            }
        }
    }

    fn provider(http: ScriptedRequester) -> (CloudflareProvider, Arc<ScriptedRequester>) {
        let http = Arc::new(http);
        (CloudflareProvider::with_api_base(http.clone(), BASE), http)
    }

    fn token() -> VerifiedToken {
        VerifiedToken::new("tok")
    }

    fn list(items: &[(&str, &str)], page: u32, total_pages: u32) -> Value {
        json!({
            "success": true,
            "result": items
                .iter()
                .map(|(id, name)| json!({ "id": id, "name": name }))
                .collect::<Vec<_>>(),
            "result_info": { "page": page, "total_pages": total_pages },
        })
    }

    #[tokio::test]
    async fn test_verify_token_sends_bearer() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/user/tokens/verify",
            200,
            json!({ "success": true, "result": { "status": "active" } }),
        );
        let (provider, http) = provider(http);

        let verified = provider.verify_token(&Credential::new("tok")).await.unwrap();

        assert_eq!(verified.secret(), "tok");
        assert_eq!(http.requests()[0].bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_verify_token_failure_is_auth_error_with_raw_body() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/user/tokens/verify",
            401,
            json!({ "success": false, "errors": [{ "code": 1000, "message": "Invalid API Token" }] }),
        );
        let (provider, _) = provider(http);

        let err = provider
            .verify_token(&Credential::new("bad"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Authentication(_)));
        assert!(err.to_string().contains("Invalid API Token"));
    }

    #[tokio::test]
    async fn test_verify_token_requires_success_flag() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/user/tokens/verify",
            200,
            json!({ "success": false }),
        );
        let (provider, _) = provider(http);

        assert!(provider.verify_token(&Credential::new("tok")).await.is_err());
    }

    #[tokio::test]
    async fn test_nonexistent_path_credential_is_sent_verbatim() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/user/tokens/verify",
            200,
            json!({ "success": true }),
        );
        let (provider, http) = provider(http);

        provider
            .verify_token(&Credential::new("/no/such/token.ini"))
            .await
            .unwrap();

        assert_eq!(
            http.requests()[0].bearer.as_deref(),
            Some("/no/such/token.ini")
        );
    }

    #[tokio::test]
    async fn test_token_file_credential() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dns_cloudflare_api_token = from-file").unwrap();

        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/user/tokens/verify",
            200,
            json!({ "success": true }),
        );
        let (provider, http) = provider(http);

        let verified = provider
            .verify_token(&Credential::new(file.path().to_str().unwrap()))
            .await
            .unwrap();

        assert_eq!(verified.secret(), "from-file");
        assert_eq!(http.requests()[0].bearer.as_deref(), Some("from-file"));
    }

    #[tokio::test]
    async fn test_zone_lookup_is_exact_match() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/zones?per_page=50&page=1",
            200,
            list(&[("id-b", "b.com"), ("id-ab", "a.b.com")], 1, 1),
        );
        let (provider, _) = provider(http);

        assert_eq!(provider.get_zone_id("a.b.com", &token()).await.unwrap(), "id-ab");
        assert_eq!(provider.get_zone_id("b.com", &token()).await.unwrap(), "id-b");

        let err = provider.get_zone_id("B.com", &token()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = provider.get_zone_id("com", &token()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_zone_lookup_follows_pages() {
        let http = ScriptedRequester::default()
            .on(
                HttpMethod::Get,
                "/zones?per_page=50&page=1",
                200,
                list(&[("id-1", "one.com")], 1, 2),
            )
            .on(
                HttpMethod::Get,
                "/zones?per_page=50&page=2",
                200,
                list(&[("id-2", "two.com")], 2, 2),
            );
        let (provider, http) = provider(http);

        assert_eq!(provider.get_zone_id("two.com", &token()).await.unwrap(), "id-2");
        assert_eq!(http.requests().len(), 2);

        // Stops after the last page
        assert!(provider.get_zone_id("three.com", &token()).await.is_err());
        assert_eq!(http.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_missing_result_info_means_single_page() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/zones?per_page=50&page=1",
            200,
            json!({ "success": true, "result": [] }),
        );
        let (provider, http) = provider(http);

        assert!(provider.get_zone_id("example.com", &token()).await.is_err());
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_record_lookup_is_exact_match() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/zones/z1/dns_records?per_page=100&page=1",
            200,
            list(
                &[("r-www", "www.my.example.com"), ("r-my", "my.example.com")],
                1,
                1,
            ),
        );
        let (provider, _) = provider(http);

        assert_eq!(
            provider
                .get_domain_id("z1", "my.example.com", &token())
                .await
                .unwrap(),
            "r-my"
        );
        assert!(provider
            .get_domain_id("z1", "example.com", &token())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_record_lookup_takes_first_match_of_any_type() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/zones/z1/dns_records?per_page=100&page=1",
            200,
            json!({
                "success": true,
                "result": [
                    { "id": "r-a", "type": "A", "name": "my.example.com", "content": "198.51.100.4", "ttl": 1, "proxied": false },
                    { "id": "r-aaaa", "type": "AAAA", "name": "my.example.com", "content": "2001:db8::4", "ttl": 1, "proxied": false }
                ],
                "result_info": { "page": 1, "per_page": 100, "count": 2, "total_count": 2, "total_pages": 1 }
            }),
        );
        let (provider, _) = provider(http);

        assert_eq!(
            provider
                .get_domain_id("z1", "my.example.com", &token())
                .await
                .unwrap(),
            "r-a"
        );
    }

    #[test]
    fn test_listing_entries_keep_record_type() {
        let list: ListResponse = serde_json::from_value(json!({
            "success": true,
            "result": [
                { "id": "r1", "type": "AAAA", "name": "my.example.com" },
                { "id": "z1", "name": "example.com", "status": "active" }
            ]
        }))
        .unwrap();

        assert_eq!(list.result[0].record_type.as_deref(), Some("AAAA"));
        assert_eq!(list.result[1].record_type, None);
        assert!(list.result_info.is_none());
    }

    #[tokio::test]
    async fn test_get_domain_ip_reads_content() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/zones/z1/dns_records/r1",
            200,
            json!({ "success": true, "result": { "id": "r1", "type": "A", "content": "198.51.100.4" } }),
        );
        let (provider, _) = provider(http);

        let ip = provider
            .get_domain_ip(&RecordRef::new("z1", "r1"), &token())
            .await
            .unwrap();
        assert_eq!(ip, "198.51.100.4");
    }

    #[tokio::test]
    async fn test_get_domain_ip_status_error_carries_body() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Get,
            "/zones/z1/dns_records/r1",
            404,
            json!({ "success": false, "errors": [{ "code": 81044, "message": "Record does not exist." }] }),
        );
        let (provider, _) = provider(http);

        let err = provider
            .get_domain_ip(&RecordRef::new("z1", "r1"), &token())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Record does not exist."));
    }

    #[tokio::test]
    async fn test_update_sends_patch_with_content_only() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Patch,
            "/zones/z1/dns_records/r1",
            200,
            json!({ "success": true, "result": { "id": "r1", "content": "203.0.113.10" } }),
        );
        let (provider, http) = provider(http);

        provider
            .update_domain_ip(&RecordRef::new("z1", "r1"), "203.0.113.10", &token())
            .await
            .unwrap();

        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Patch);
        assert_eq!(requests[0].bearer.as_deref(), Some("tok"));
        assert_eq!(requests[0].body, Some(json!({ "content": "203.0.113.10" })));
    }

    #[tokio::test]
    async fn test_update_requires_success_flag() {
        let http = ScriptedRequester::default().on(
            HttpMethod::Patch,
            "/zones/z1/dns_records/r1",
            200,
            json!({ "success": false }),
        );
        let (provider, _) = provider(http);

        assert!(provider
            .update_domain_ip(&RecordRef::new("z1", "r1"), "203.0.113.10", &token())
            .await
            .is_err());
    }

    #[test]
    fn test_registration() {
        let registry = ProviderRegistry::new();
        register(&registry);
        assert!(registry.has_provider("cloudflare"));

        let http: Arc<dyn HttpRequester> = Arc::new(ScriptedRequester::default());
        let provider = registry.create_provider("cloudflare", http).ok().unwrap();
        assert_eq!(provider.provider_name(), "cloudflare");
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let http: Arc<dyn HttpRequester> = Arc::new(ScriptedRequester::default());
        let provider = CloudflareProvider::with_api_base(http, "https://cf.test/client/v4/");
        assert_eq!(provider.url("/zones"), "https://cf.test/client/v4/zones");
    }
}
