// # Cloud DNS v1 Transport
//
// `CloudDnsApi` is the seam between the adapter and the remote service.
// Each method issues exactly one request and returns one page or one
// response. Following continuation tokens is the caller's job.
//
// ## API Reference
//
// - List zones: GET `/projects/:project/managedZones?pageToken=...`
// - List record sets: GET `/projects/:project/managedZones/:zone/rrsets?pageToken=...`
// - Create change: POST `/projects/:project/managedZones/:zone/changes`
//
// No retries, no backoff: failures are returned to the caller as-is.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use zonesync_core::{Error, Result};

use crate::PROVIDER_NAME;
use crate::wire::{ChangeRequest, ChangeResponse, ManagedZonesPage, RecordSetsPage};

/// Cloud DNS API base URL
pub const DEFAULT_ENDPOINT: &str = "https://dns.googleapis.com/dns/v1";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One-request-per-call access to the Cloud DNS API
#[async_trait]
pub trait CloudDnsApi: Send + Sync {
    /// One page of the project's managed zones
    async fn list_managed_zones(&self, page_token: Option<&str>) -> Result<ManagedZonesPage>;

    /// One page of a managed zone's record sets
    async fn list_record_sets(
        &self,
        zone_id: &str,
        page_token: Option<&str>,
    ) -> Result<RecordSetsPage>;

    /// Submit one change to a managed zone
    async fn create_change(&self, zone_id: &str, change: &ChangeRequest) -> Result<ChangeResponse>;
}

/// `reqwest`-backed [`CloudDnsApi`]
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the access token.
pub struct HttpCloudDnsClient {
    /// Cloud project owning the managed zones
    project_id: String,

    /// OAuth2 bearer token
    /// ⚠️ NEVER log this value
    access_token: String,

    /// Base URL, without trailing slash
    endpoint: String,

    client: reqwest::Client,
}

impl std::fmt::Debug for HttpCloudDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCloudDnsClient")
            .field("project_id", &self.project_id)
            .field("access_token", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpCloudDnsClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `project_id`: Cloud project that owns the managed zones
    /// - `access_token`: OAuth2 bearer token with the DNS read/write scope
    /// - `endpoint`: Optional base URL override (defaults to [`DEFAULT_ENDPOINT`])
    /// - `timeout`: Per-request timeout
    pub fn new(
        project_id: impl Into<String>,
        access_token: impl Into<String>,
        endpoint: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let project_id = project_id.into();
        let access_token = access_token.into();

        if project_id.is_empty() {
            return Err(Error::config("Google Cloud DNS project id cannot be empty"));
        }
        if access_token.is_empty() {
            return Err(Error::config("Google Cloud DNS access token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            project_id,
            access_token,
            endpoint,
            client,
        })
    }

    fn zones_url(&self) -> String {
        format!("{}/projects/{}/managedZones", self.endpoint, self.project_id)
    }

    fn zone_url(&self, zone_id: &str, collection: &str) -> String {
        format!("{}/{}/{}", self.zones_url(), zone_id, collection)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        page_token: Option<&str>,
        context: &str,
    ) -> Result<T> {
        tracing::debug!("GET {} (page token: {:?})", url, page_token);

        let mut request = self.client.get(url).bearer_auth(&self.access_token);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: request failed: {}", context, e)))?;

        parse(check_status(response, context).await?, context).await
    }
}

#[async_trait]
impl CloudDnsApi for HttpCloudDnsClient {
    async fn list_managed_zones(&self, page_token: Option<&str>) -> Result<ManagedZonesPage> {
        self.get_page(&self.zones_url(), page_token, "List managed zones")
            .await
    }

    async fn list_record_sets(
        &self,
        zone_id: &str,
        page_token: Option<&str>,
    ) -> Result<RecordSetsPage> {
        let context = format!("List record sets of zone {}", zone_id);
        self.get_page(&self.zone_url(zone_id, "rrsets"), page_token, &context)
            .await
    }

    async fn create_change(&self, zone_id: &str, change: &ChangeRequest) -> Result<ChangeResponse> {
        let url = self.zone_url(zone_id, "changes");
        let context = format!("Create change in zone {}", zone_id);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(change)
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: request failed: {}", context, e)))?;

        parse(check_status(response, &context).await?, &context).await
    }
}

async fn check_status(response: Response, context: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    Err(status_error(status, &error_text, context))
}

async fn parse<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    response.json().await.map_err(|e| {
        Error::provider(
            PROVIDER_NAME,
            format!("{}: failed to parse response: {}", context, e),
        )
    })
}

/// Map a non-success HTTP status to an error
fn status_error(status: StatusCode, error_text: &str, context: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{}: invalid access token or insufficient permissions. Status: {}",
            context, status
        )),
        // A missing zone is only known from the inventory; a 404 here means
        // a wrong project, zone id or endpoint
        404 => Error::provider(
            PROVIDER_NAME,
            format!("{}: resource not found: {} - {}", context, status, error_text),
        ),
        409 => Error::provider(
            PROVIDER_NAME,
            format!(
                "{}: conflict, the record set already exists or was changed concurrently. Status: {}",
                context, status
            ),
        ),
        429 => Error::rate_limited(format!(
            "{}: rate limit exceeded. Please retry later. Status: {}",
            context, status
        )),
        500..=599 => Error::provider(
            PROVIDER_NAME,
            format!("{}: server error (transient): {} - {}", context, status, error_text),
        ),
        _ => Error::provider(
            PROVIDER_NAME,
            format!("{}: {} - {}", context, status, error_text),
        ),
    }
}
