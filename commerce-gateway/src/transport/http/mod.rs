//! HTTP transport implementation.
//!
//! This module provides HTTP/1.1 and HTTP/2 transport using reqwest.

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{GatewayError, Result},
    transport::{HttpMethod, Transport, TransportRequest, TransportResponse},
};

/// Validates URL for security constraints.
///
/// Ensures the URL uses HTTPS and does not point to localhost.
fn validate_url(url: &Url) -> Result<()> {
    if url.scheme() != "https" {
        return Err(GatewayError::Transport("Only HTTPS URLs are allowed".to_owned()));
    }

    if let Some(host) = url.host_str()
        && (host == "localhost" || host.starts_with("127.") || host == "::1" || host == "[::1]")
    {
        return Err(GatewayError::Transport("Localhost URLs are not allowed".to_owned()));
    }

    Ok(())
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains('\r') || name.contains('\n') || name.contains('\0') {
        return Err(GatewayError::Transport(
            "Invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains('\r') || value.contains('\n') || value.contains('\0') {
        return Err(GatewayError::Transport(
            "Invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

const fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
    }
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Supports automatic connection pooling, keep-alive, and HTTP/2 multiplexing. One
/// instance is shared by every adapter a [`Registry`](crate::registry::Registry) builds,
/// so the connection pool is the only state shared between platforms.
///
/// # Examples
///
/// ```
/// use commerce_gateway::transport::{HttpConfig, HttpTransport, HttpVersion, Transport};
///
/// let config = HttpConfig {
///     pool_max_idle_per_host: 20,
///     timeout_secs: 60,
///     connect_timeout_secs: 15,
///     http_version: HttpVersion::Http1,
///     ..HttpConfig::default()
/// };
///
/// let transport = HttpTransport::with_config(&config).unwrap();
/// assert_eq!(transport.protocol_name(), "http/1.1");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl HttpTransport {
    /// Creates a new HTTP transport with default settings.
    ///
    /// Default configuration:
    /// - Pool max idle per host: 100
    /// - Timeout: 30 seconds
    /// - Connect timeout: 10 seconds
    /// - HTTP version: Auto (prefer HTTP/2)
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is out of bounds or HTTP client creation fails.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build().map_err(GatewayError::Http)?;

        Ok(Self { client, http_version: config.http_version })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(
        skip(self, request),
        fields(method = %request.method, host = request.url.host_str().unwrap_or_default(), path = request.url.path())
    )]
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        validate_url(&request.url)?;

        for (key, value) in &request.headers {
            validate_header(key, value)?;
        }

        let mut builder = self.client.request(reqwest_method(request.method), request.url);
        for (key, value) in request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        let body = response.bytes().await.map_err(GatewayError::Http)?.to_vec();

        debug!(status, body_len = body.len(), "response received");

        Ok(TransportResponse { status, body, headers })
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_new() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.protocol_name(), "http");
    }

    #[test]
    fn test_http_transport_protocol_name() {
        let http1 = HttpConfig { http_version: HttpVersion::Http1, ..Default::default() };
        assert_eq!(HttpTransport::with_config(&http1).unwrap().protocol_name(), "http/1.1");

        let http2 = HttpConfig { http_version: HttpVersion::Http2, ..Default::default() };
        assert_eq!(HttpTransport::with_config(&http2).unwrap().protocol_name(), "http/2");
    }

    #[test]
    fn test_http_transport_rejects_invalid_config() {
        let config = HttpConfig { timeout_secs: 0, ..Default::default() };
        assert!(matches!(HttpTransport::with_config(&config), Err(GatewayError::Config(_))));
    }

    #[tokio::test]
    async fn test_execute_rejects_http_scheme() {
        let transport = HttpTransport::new().unwrap();
        let request =
            TransportRequest::new(HttpMethod::Get, Url::parse("http://shop.example.com/products").unwrap());

        let result = transport.execute(request).await;
        assert!(matches!(result, Err(GatewayError::Transport(msg)) if msg.contains("HTTPS")));
    }

    #[tokio::test]
    async fn test_execute_rejects_localhost() {
        let transport = HttpTransport::new().unwrap();
        for url in ["https://localhost/products", "https://127.0.0.1/products"] {
            let request = TransportRequest::new(HttpMethod::Get, Url::parse(url).unwrap());
            let result = transport.execute(request).await;
            assert!(matches!(result, Err(GatewayError::Transport(_))), "{url}");
        }
    }

    #[tokio::test]
    async fn test_execute_rejects_crlf_header() {
        let transport = HttpTransport::new().unwrap();
        let request =
            TransportRequest::new(HttpMethod::Get, Url::parse("https://shop.example.com/").unwrap())
                .header("Authorization", "Bearer tok\r\nX-Injected: 1");

        let result = transport.execute(request).await;
        assert!(matches!(result, Err(GatewayError::Transport(msg)) if msg.contains("header value")));
    }

    #[test]
    fn test_validate_header() {
        assert!(validate_header("X-Auth-Token", "abc").is_ok());
        assert!(validate_header("X-Auth\n", "abc").is_err());
        assert!(validate_header("X-Auth", "a\0b").is_err());
    }

    #[test]
    fn test_reqwest_method_mapping() {
        assert_eq!(reqwest_method(HttpMethod::Get), Method::GET);
        assert_eq!(reqwest_method(HttpMethod::Patch), Method::PATCH);
    }
}
