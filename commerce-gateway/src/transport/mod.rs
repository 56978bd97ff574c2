//! Transport abstraction layer.
//!
//! A [`Transport`] performs one HTTP round trip and nothing else: it does not interpret
//! status codes, parse bodies or retry. Platform semantics live in
//! [`PlatformClient`](crate::client::PlatformClient), which builds [`TransportRequest`]s
//! and turns [`TransportResponse`]s into JSON or typed errors.
//!
//! # Examples
//!
//! ```rust,no_run
//! use commerce_gateway::transport::{HttpMethod, HttpTransport, Transport, TransportRequest};
//! use url::Url;
//!
//! # async fn example() -> commerce_gateway::error::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let url = Url::parse("https://api.weebly.com/v3/products").unwrap();
//! let request = TransportRequest::new(HttpMethod::Get, url)
//!     .header("Authorization", "Bearer token")
//!     .header("Accept", "application/json");
//!
//! let response = transport.execute(request).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::error::Result;

pub mod config;
pub mod http;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockTransport;

/// HTTP methods used by platform APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PUT.
    Put,
    /// PATCH.
    Patch,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved HTTP request.
#[derive(Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers, including credentials.
    pub headers: Vec<(String, String)>,
    /// Request body bytes.
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub const fn new(method: HttpMethod, url: Url) -> Self {
        Self { method, url, headers: Vec::new(), body: None }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the first header with the given name (case-insensitive).
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// Header values carry credentials, so only names are printed.
impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("TransportRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &header_names)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

/// Response from transport operations.
///
/// Contains the raw response body, HTTP status code, and response headers.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// One HTTP round trip.
///
/// Implementations must be shareable across tasks; adapters hold them behind
/// `Arc<dyn Transport>`.
///
/// # Security
///
/// [`HttpTransport`] rejects non-HTTPS and loopback URLs and headers containing CR, LF or
/// NUL before anything is sent.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends the request and returns the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns error if the request is rejected by validation or the round trip fails
    /// (connection, TLS, timeout).
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse>;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}
