//! HTTP client configuration.
//!
//! Read from the `[http]` table of the gateway configuration file.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// HTTP client configuration shared by every platform.
///
/// Timeouts are the only bound on how long a gateway call can take: the gateway itself
/// never retries and never waits on anything but the platform.
///
/// # Examples
///
/// ```
/// use commerce_gateway::transport::{HttpConfig, HttpVersion};
///
/// let config: HttpConfig = toml::from_str(
///     r#"
///         timeout_secs = 45
///         http_version = "http1"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.timeout_secs, 45);
/// assert_eq!(config.connect_timeout_secs, 10);
/// assert_eq!(config.http_version, HttpVersion::Http1);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Maximum idle connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// HTTP version preference.
    #[serde(default)]
    pub http_version: HttpVersion,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            http_version: HttpVersion::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Validates configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if:
    /// - `timeout_secs` is outside 1-300 seconds
    /// - `connect_timeout_secs` is outside 1-60 seconds
    /// - `user_agent` contains control characters
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(GatewayError::Config("timeout_secs must be between 1 and 300".to_owned()));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(GatewayError::Config(
                "connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        if self.user_agent.chars().any(char::is_control) {
            return Err(GatewayError::Config(
                "user_agent must not contain control characters".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns timeout as Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns connect timeout as Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// HTTP version preference.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 only (requires prior knowledge).
    Http2,
    /// Auto-negotiate (prefer HTTP/2, fall back to HTTP/1.1).
    #[default]
    Auto,
}

const fn default_pool_max_idle() -> usize {
    100
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("commerce-gateway/", env!("CARGO_PKG_VERSION")).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_default() {
        let config = HttpConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 100);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.http_version, HttpVersion::Auto);
        assert!(config.user_agent.starts_with("commerce-gateway/"));
    }

    #[test]
    fn test_http_config_empty_toml_uses_defaults() {
        let config: HttpConfig = toml::from_str("").unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.pool_max_idle_per_host, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_version_all_variants() {
        #[derive(Deserialize)]
        struct Wrapper {
            http_version: HttpVersion,
        }

        for (raw, expected) in
            [("http1", HttpVersion::Http1), ("http2", HttpVersion::Http2), ("auto", HttpVersion::Auto)]
        {
            let wrapper: Wrapper = toml::from_str(&format!("http_version = \"{raw}\"")).unwrap();
            assert_eq!(wrapper.http_version, expected);
        }
    }

    #[test]
    fn test_http_version_invalid_value() {
        let result: std::result::Result<HttpConfig, _> = toml::from_str("http_version = \"http3\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let zero = HttpConfig { timeout_secs: 0, ..HttpConfig::default() };
        assert!(zero.validate().is_err());

        let too_large = HttpConfig { timeout_secs: 301, ..HttpConfig::default() };
        assert!(too_large.validate().is_err());

        let max = HttpConfig { timeout_secs: 300, ..HttpConfig::default() };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn test_validate_connect_timeout_bounds() {
        let zero = HttpConfig { connect_timeout_secs: 0, ..HttpConfig::default() };
        assert!(matches!(zero.validate(), Err(GatewayError::Config(_))));

        let too_large = HttpConfig { connect_timeout_secs: 61, ..HttpConfig::default() };
        assert!(too_large.validate().is_err());
    }

    #[test]
    fn test_validate_user_agent_control_characters() {
        let config = HttpConfig { user_agent: "agent\r\nX-Evil: 1".to_owned(), ..HttpConfig::default() };
        assert!(config.validate().is_err());
    }
}
