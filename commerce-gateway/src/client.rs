//! HTTP client bound to one platform.
//!
//! [`PlatformClient`] owns a resolved base URL and authentication headers and turns
//! relative API paths into JSON responses. It knows nothing about products or orders;
//! that translation lives in [`PlatformAdapter`](crate::adapter::PlatformAdapter).

use std::{fmt, sync::Arc};

use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    error::{GatewayError, Result},
    platform::{Platform, PlatformConfig},
    transport::{HttpMethod, Transport, TransportRequest},
};

/// Longest error body kept in [`GatewayError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Rejects paths containing directory traversal sequences.
fn sanitize_path(path: &str) -> Result<&str> {
    if path.contains("..") || path.contains("//") {
        return Err(GatewayError::Transport(
            "Invalid path: traversal sequences not allowed".to_owned(),
        ));
    }
    if !path.is_empty() && !path.starts_with('/') {
        return Err(GatewayError::Transport("Path must start with '/'".to_owned()));
    }
    Ok(path)
}

fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut chars = text.chars();
    let truncated: String = chars.by_ref().take(MAX_ERROR_BODY_CHARS).collect();
    if chars.next().is_some() { format!("{truncated}...") } else { truncated }
}

/// HTTP client for one platform account.
///
/// Every request carries the platform's authentication headers and
/// `Accept: application/json`; requests with a body also carry
/// `Content-Type: application/json`. Nothing is retried.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use commerce_gateway::{
///     client::PlatformClient,
///     platform::{Platform, PlatformConfig},
///     transport::HttpTransport,
/// };
///
/// let config = PlatformConfig::new("shopify")
///     .with_store("test.myshopify.com")
///     .with_access_token("tok");
/// let transport = Arc::new(HttpTransport::new().unwrap());
///
/// let client = PlatformClient::connect(Platform::Shopify, &config, transport).unwrap();
/// assert_eq!(client.base_url(), "https://test.myshopify.com/admin/api/2023-01");
/// ```
#[derive(Clone)]
pub struct PlatformClient {
    platform: Platform,
    base_url: String,
    headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
}

impl PlatformClient {
    /// Resolves the platform's base URL and credentials from a configuration.
    ///
    /// Environment-variable secrets are read here, once.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the base URL cannot be derived, is not a valid
    /// URL, or a required credential is missing.
    pub fn connect(
        platform: Platform,
        config: &PlatformConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let profile = platform.profile();
        let base_url = profile.base_url.resolve(platform, config)?;
        Url::parse(&base_url)
            .map_err(|e| GatewayError::Config(format!("invalid base URL '{base_url}': {e}")))?;
        let headers = profile.auth.headers(platform, config)?;

        Ok(Self::new(platform, base_url, headers, transport))
    }

    /// Creates a client from already resolved parts.
    #[must_use]
    pub fn new(
        platform: Platform,
        base_url: impl Into<String>,
        headers: Vec<(String, String)>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { platform, base_url, headers, transport }
    }

    /// Returns the platform this client talks to.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the resolved base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request and decodes the JSON response.
    ///
    /// An empty response body decodes to [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Transport`] if the path or URL is unsafe or malformed
    /// - [`GatewayError::Http`] if the round trip fails
    /// - [`GatewayError::Status`] if the platform answers with a non-2xx status
    /// - [`GatewayError::InvalidResponse`] if the body is not JSON
    #[instrument(skip(self, method, body), fields(platform = %self.platform, %method))]
    pub async fn request(&self, method: HttpMethod, path: &str, body: Option<&Value>) -> Result<Value> {
        let path = sanitize_path(path)?;
        let url = Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|e| GatewayError::Transport(format!("invalid request URL: {e}")))?;

        let mut request = TransportRequest::new(method, url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request = request.header("Accept", "application/json");

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| GatewayError::InvalidInput(format!("cannot encode request body: {e}")))?;
            request = request.header("Content-Type", "application/json").body(bytes);
        }

        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            warn!(status = response.status, "platform returned error status");
            return Err(GatewayError::Status {
                platform: self.platform,
                status: response.status,
                body: truncate_body(&response.body),
            });
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            debug!(status = response.status, "empty response body");
            return Ok(Value::Null);
        }

        serde_json::from_slice(&response.body).map_err(|e| GatewayError::InvalidResponse {
            platform: self.platform,
            message: e.to_string(),
        })
    }
}

// Header values are credentials.
impl fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("PlatformClient")
            .field("platform", &self.platform)
            .field("base_url", &self.base_url)
            .field("headers", &header_names)
            .field("transport", &self.transport.protocol_name())
            .finish()
    }
}
