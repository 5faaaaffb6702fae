//! HTTP transport capability and request configuration.
//!
//! The client never talks to `reqwest` directly: it resolves a fully formed
//! [`ApiRequest`] and hands it to a [`Transport`]. [`ReqwestTransport`] is the
//! production implementation; tests substitute an in-memory one.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::auth::TokenAuthentication;
use super::error::{ApiError, InvalidValueError, Result};

/// A request ready to be sent: absolute URL, final headers, optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// Status and raw body of a response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response carrying `body` serialized as JSON.
    pub fn json(body: &Value) -> Self {
        Self::new(StatusCode::OK, body.to_string())
    }
}

/// Executes HTTP requests.
///
/// Implementations report transport failures (connection, TLS, timeouts) as
/// errors and return every HTTP response, whatever its status, as
/// `Ok(ApiResponse)`. Status handling belongs to the client.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport. Without a timeout the reqwest default applies.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Network)?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        debug!(method = %request.method, url = %request.url, "sending HTTP request");

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(%status, bytes = body.len(), "received HTTP response");
        Ok(ApiResponse { status, body })
    }
}

/// Caller-supplied client configuration, merged over the mandatory
/// authentication configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Replaces the authentication provider's API URL when set.
    pub base_uri: Option<String>,
    /// Merged key by key over the mandatory headers.
    pub headers: HeaderMap,
    /// Request timeout handed to the transport.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, parsing name and value.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            InvalidValueError::new(format!("invalid header name '{}'", name)).with_source(e)
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            InvalidValueError::new(format!("invalid value for header '{}'", name)).with_source(e)
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The resolved configuration every request is built from.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    base_uri: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl TransportConfig {
    /// The mandatory configuration derived from an authentication provider:
    /// JSON accept/content headers, no caching, bearer token, and the API URL
    /// as base URI.
    pub fn from_auth<A: TokenAuthentication + ?Sized>(auth: &A) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", auth.token()))
            .map_err(|e| {
                InvalidValueError::new("token cannot be used in an Authorization header")
                    .with_source(e)
            })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            base_uri: parse_base_uri(auth.api_url())?,
            headers,
            timeout: None,
        })
    }

    /// Merge caller configuration over this one.
    ///
    /// Headers are replaced only where the caller supplies the same name.
    pub fn merge(mut self, config: ClientConfig) -> Result<Self> {
        if let Some(base_uri) = config.base_uri {
            self.base_uri = parse_base_uri(&base_uri)?;
        }
        self.headers.extend(config.headers);
        if config.timeout.is_some() {
            self.timeout = config.timeout;
        }
        Ok(self)
    }

    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolve a relative request URI against the base URI.
    pub fn resolve(&self, uri: &str) -> Result<Url> {
        self.base_uri
            .join(uri)
            .map_err(|e| ApiError::InvalidUrl(format!("{} (relative to {}): {}", uri, self.base_uri, e)))
    }
}

/// Parse a base URI, giving its path a trailing slash so relative request
/// URIs are appended to it rather than replacing its last segment.
fn parse_base_uri(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if url.scheme() != "https" && url.host_str() != Some("localhost") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }
    if !url.cannot_be_a_base() && !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
