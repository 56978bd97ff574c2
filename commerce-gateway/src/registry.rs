//! Adapter registry.
//!
//! Maps platform names to adapters. The table of platforms is static; the registry owns
//! the transport every adapter it builds will share.

use std::sync::Arc;

use tracing::debug;

use crate::{
    adapter::{Adapter, PlatformAdapter},
    error::{GatewayError, Result},
    platform::{Platform, PlatformConfig},
    transport::{HttpConfig, HttpTransport, Transport},
};

/// Builds adapters for named platforms.
///
/// # Examples
///
/// ```
/// use commerce_gateway::{platform::PlatformConfig, registry::Registry, transport::HttpConfig};
///
/// let registry = Registry::with_http(&HttpConfig::default()).unwrap();
/// let config = PlatformConfig::new("bigcommerce").with_store("abc123").with_access_token("tok");
///
/// let adapter = registry.resolve("bigcommerce", &config).unwrap();
/// assert_eq!(adapter.platform().id(), "bigcommerce");
///
/// assert!(registry.resolve("etsy", &config).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    transport: Arc<dyn Transport>,
}

impl Registry {
    /// Creates a registry whose adapters share `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates a registry backed by an [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the HTTP configuration is invalid, or
    /// [`GatewayError::Http`] if the client cannot be built.
    pub fn with_http(config: &HttpConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::with_config(config)?)))
    }

    /// Supported platforms, in table order.
    #[must_use]
    pub const fn platforms(&self) -> &'static [Platform] {
        &Platform::ALL
    }

    /// Resolves a name to a platform without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownPlatform`] if the name is not in the table.
    pub fn lookup(&self, name: &str) -> Result<Platform> {
        Platform::lookup(name)
    }

    /// Builds an adapter for the named platform.
    ///
    /// The name is resolved before the configuration is looked at, so an unknown name
    /// fails without side effects. If `config.platform` is set it must name the same
    /// platform.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownPlatform`] for an unknown name, or
    /// [`GatewayError::Config`] if the configuration names another platform or fails
    /// validation.
    pub fn resolve(&self, name: &str, config: &PlatformConfig) -> Result<Arc<dyn Adapter>> {
        let platform = self.lookup(name)?;

        if let Some(configured) = config.platform.as_deref() {
            let configured_platform = Platform::lookup(configured)?;
            if configured_platform != platform {
                return Err(GatewayError::Config(format!(
                    "configuration is for {configured_platform} but {platform} was requested"
                )));
            }
        }

        let adapter = PlatformAdapter::new(platform, config, Arc::clone(&self.transport))?;
        debug!(%platform, name, "adapter resolved");
        Ok(Arc::new(adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn registry() -> (Registry, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        (Registry::new(Arc::clone(&transport) as Arc<dyn Transport>), transport)
    }

    #[test]
    fn test_platforms_listed() {
        let (registry, _) = registry();
        assert_eq!(registry.platforms().len(), 17);
        assert!(registry.platforms().contains(&Platform::ZohoCommerce));
    }

    #[test]
    fn test_unknown_platform() {
        let (registry, transport) = registry();
        // Invalid config would fail validation; the name check must come first.
        let config = PlatformConfig::new("shopify").with_base_url("http://127.0.0.1");

        let err = registry.resolve("etsy", &config).unwrap_err();
        assert!(matches!(err, GatewayError::UnknownPlatform(ref name) if name == "etsy"));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_resolve_by_alias() {
        let (registry, _) = registry();
        let config =
            PlatformConfig::new("sfcc").with_base_url("https://shop.example.com/s/-/dw/data/v23_2");
        let config = config.with_access_token("tok");

        let adapter = registry.resolve("Salesforce Commerce Cloud", &config).unwrap();
        assert_eq!(adapter.platform(), Platform::Sfcc);
    }

    #[test]
    fn test_mismatched_config_platform() {
        let (registry, _) = registry();
        let config = PlatformConfig::new("woocommerce")
            .with_base_url("https://shop.example.com/wp-json/wc/v3")
            .with_basic_auth("ck", "cs");

        let err = registry.resolve("shopify", &config).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_config_without_platform_field() {
        let (registry, _) = registry();
        let config = PlatformConfig {
            platform: None,
            ..PlatformConfig::new("ignored").with_access_token("tok")
        };

        let adapter = registry.resolve("weebly", &config).unwrap();
        assert_eq!(adapter.platform(), Platform::Weebly);
    }
}
