//! Gateway facade.
//!
//! [`Gateway`] is the entry point most callers need: it owns a [`Registry`], the named
//! platform accounts from the configuration file and the audit sink. Resolving a platform
//! returns a [`PlatformHandle`] that forwards the three operations to the adapter and
//! audits the mutating ones.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    adapter::{Adapter, OrderRequest, OrderResult},
    audit::{self, AuditEvent, AuditEventType, AuditSink, TracingAuditSink},
    error::{GatewayError, Result},
    normalize::NormalizedProduct,
    platform::{Capabilities, Platform, PlatformConfig},
    registry::Registry,
    transport::{HttpConfig, Transport},
};

/// Gateway configuration file.
///
/// # Examples
///
/// ```
/// use commerce_gateway::gateway::GatewayConfig;
///
/// let config = GatewayConfig::from_toml(
///     r#"
///         [http]
///         timeout_secs = 20
///
///         [platforms.main-shop]
///         platform = "shopify"
///         shop = "test.myshopify.com"
///         access_token = { env = "SHOPIFY_TOKEN" }
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.http.timeout_secs, 20);
/// assert!(config.platforms.contains_key("main-shop"));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    /// HTTP client settings shared by every platform.
    #[serde(default)]
    pub http: HttpConfig,

    /// Platform accounts keyed by a caller-chosen name.
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformConfig>,
}

impl GatewayConfig {
    /// Parses and validates a configuration from TOML.
    ///
    /// Every account must carry a `platform` key naming a supported platform.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the TOML is malformed or any section fails
    /// validation, or [`GatewayError::UnknownPlatform`] if an account names an unsupported
    /// platform.
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| GatewayError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the file cannot be read, plus any error of
    /// [`GatewayConfig::from_toml`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Validates the HTTP section and every platform account.
    ///
    /// # Errors
    ///
    /// See [`GatewayConfig::from_toml`].
    pub fn validate(&self) -> Result<()> {
        self.http.validate()?;

        for (name, platform) in &self.platforms {
            let id = platform.platform.as_deref().ok_or_else(|| {
                GatewayError::Config(format!("platform account {name:?} has no platform key"))
            })?;
            Platform::lookup(id)?;
            platform
                .validate()
                .map_err(|e| GatewayError::Config(format!("platform account {name:?}: {e}")))?;
        }
        Ok(())
    }
}

/// Uniform entry point over every supported platform.
///
/// # Examples
///
/// ```no_run
/// use commerce_gateway::{gateway::Gateway, platform::PlatformConfig};
///
/// # async fn example() -> commerce_gateway::error::Result<()> {
/// let gateway = Gateway::new()?;
/// let config = PlatformConfig::new("shopify")
///     .with_store("test.myshopify.com")
///     .with_access_token("tok");
///
/// for product in gateway.platform("shopify", &config)?.fetch_products().await? {
///     println!("{} {} ({} in stock)", product.title, product.price, product.stock);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Gateway {
    registry: Registry,
    accounts: BTreeMap<String, PlatformConfig>,
    audit: Arc<dyn AuditSink>,
}

impl Gateway {
    /// Creates a gateway with default HTTP settings and no configured accounts.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(Registry::with_http(&HttpConfig::default())?))
    }

    /// Creates a gateway from a parsed configuration file.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`GatewayConfig::validate`], or
    /// [`GatewayError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let mut gateway = Self::with_registry(Registry::with_http(&config.http)?);
        gateway.accounts = config.platforms;
        Ok(gateway)
    }

    /// Creates a gateway whose adapters use `transport`.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::with_registry(Registry::new(transport))
    }

    fn with_registry(registry: Registry) -> Self {
        Self { registry, accounts: BTreeMap::new(), audit: Arc::new(TracingAuditSink) }
    }

    /// Adds or replaces a named platform account.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_account(mut self, name: impl Into<String>, config: PlatformConfig) -> Self {
        self.accounts.insert(name.into(), config);
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Returns the adapter registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolves a platform by name with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`Registry::resolve`].
    pub fn platform(&self, name: &str, config: &PlatformConfig) -> Result<PlatformHandle> {
        let adapter = self.registry.resolve(name, config)?;
        Ok(PlatformHandle { adapter, label: None, audit: Arc::clone(&self.audit) })
    }

    /// Resolves a configured platform account by its name.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if no account has that name, plus any error of
    /// [`Registry::resolve`].
    pub fn configured(&self, name: &str) -> Result<PlatformHandle> {
        let config = self
            .accounts
            .get(name)
            .ok_or_else(|| GatewayError::Config(format!("no platform account named {name:?}")))?;
        let platform = config.platform.as_deref().ok_or_else(|| {
            GatewayError::Config(format!("platform account {name:?} has no platform key"))
        })?;

        let adapter = self.registry.resolve(platform, config)?;
        debug!(account = name, platform = %adapter.platform(), "account resolved");
        Ok(PlatformHandle {
            adapter,
            label: Some(name.to_owned()),
            audit: Arc::clone(&self.audit),
        })
    }

    /// Names of the configured platform accounts, sorted.
    pub fn configured_names(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }
}

/// A resolved platform, ready for calls.
///
/// Cheap to clone; clones share the adapter.
#[derive(Debug, Clone)]
pub struct PlatformHandle {
    adapter: Arc<dyn Adapter>,
    label: Option<String>,
    audit: Arc<dyn AuditSink>,
}

impl PlatformHandle {
    /// Platform this handle talks to.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.adapter.platform()
    }

    /// Operations available on this platform.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.adapter.capabilities()
    }

    /// Configured account name, if the handle came from [`Gateway::configured`].
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the underlying adapter.
    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn Adapter> {
        &self.adapter
    }

    /// Lists the platform's products.
    ///
    /// # Errors
    ///
    /// See [`Adapter::fetch_products`].
    pub async fn fetch_products(&self) -> Result<Vec<NormalizedProduct>> {
        self.adapter.fetch_products().await
    }

    /// Creates an order. The outcome is audited.
    ///
    /// # Errors
    ///
    /// See [`Adapter::create_order`].
    pub async fn create_order(&self, order: OrderRequest) -> Result<OrderResult> {
        let started = Instant::now();
        let result = self.adapter.create_order(order).await;

        let event = match &result {
            Ok(created) => {
                let event = self.event(AuditEventType::OrderCreated, started.elapsed());
                match order_id(created.as_value()) {
                    Some(id) => event.with_order_id(id),
                    None => event,
                }
            }
            Err(error) => self
                .event(AuditEventType::OrderFailed, started.elapsed())
                .with_error(error.to_string()),
        };
        audit::dispatch(&self.audit, event);

        result
    }

    /// Sets a product's stock level. The outcome is audited.
    ///
    /// # Errors
    ///
    /// See [`Adapter::update_inventory`].
    pub async fn update_inventory(&self, product_id: &str, quantity: i64) -> Result<OrderResult> {
        let started = Instant::now();
        let result = self.adapter.update_inventory(product_id, quantity).await;

        let event_type = if result.is_ok() {
            AuditEventType::InventoryUpdated
        } else {
            AuditEventType::InventoryUpdateFailed
        };
        let mut event = self
            .event(event_type, started.elapsed())
            .with_product_id(product_id)
            .with_quantity(quantity);
        if let Err(error) = &result {
            event = event.with_error(error.to_string());
        }
        audit::dispatch(&self.audit, event);

        result
    }

    fn event(&self, event_type: AuditEventType, elapsed: Duration) -> AuditEvent {
        let event = AuditEvent::new(event_type, self.platform()).with_duration(elapsed);
        match &self.label {
            Some(label) => event.with_label(label.as_str()),
            None => event,
        }
    }
}

/// Reads the platform's order id from an order response, if it has a recognizable one.
fn order_id(response: &Value) -> Option<String> {
    ["/id", "/order_id", "/orderNo", "/code", "/data/id"]
        .into_iter()
        .find_map(|pointer| match response.pointer(pointer)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::transport::MockTransport;

    #[derive(Debug, Default)]
    struct RecordingSink {
        events: Mutex<Vec<AuditEvent>>,
    }

    #[async_trait]
    impl AuditSink for RecordingSink {
        async fn record(&self, event: &AuditEvent) -> Result<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    impl RecordingSink {
        async fn wait_for(&self, count: usize) -> Vec<AuditEvent> {
            for _ in 0..100 {
                {
                    let events = self.events.lock().unwrap();
                    if events.len() >= count {
                        return events.clone();
                    }
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            self.events.lock().unwrap().clone()
        }
    }

    fn gateway() -> (Gateway, Arc<MockTransport>, Arc<RecordingSink>) {
        let transport = Arc::new(MockTransport::new());
        let sink = Arc::new(RecordingSink::default());
        let gateway = Gateway::with_transport(Arc::clone(&transport) as Arc<dyn Transport>)
            .with_audit_sink(Arc::clone(&sink) as Arc<dyn AuditSink>)
            .with_account(
                "main-shop",
                PlatformConfig::new("shopify")
                    .with_store("test.myshopify.com")
                    .with_access_token("tok"),
            );
        (gateway, transport, sink)
    }

    #[test]
    fn test_config_requires_platform_key() {
        let err = GatewayConfig::from_toml(
            r#"
                [platforms.nameless]
                base_url = "https://shop.example.com"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::Config(ref msg) if msg.contains("nameless")));
    }

    #[test]
    fn test_config_rejects_unknown_platform() {
        let err = GatewayConfig::from_toml(
            r#"
                [platforms.market]
                platform = "etsy"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::UnknownPlatform(_)));
    }

    #[test]
    fn test_config_rejects_invalid_account() {
        let err = GatewayConfig::from_toml(
            r#"
                [platforms.local]
                platform = "magento"
                base_url = "https://localhost/shop"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::Config(ref msg) if msg.contains("local")));
    }

    #[test]
    fn test_config_file_not_found() {
        let err = GatewayConfig::from_file("/nonexistent/gateway.toml").unwrap_err();
        assert!(matches!(err, GatewayError::Config(ref msg) if msg.contains("cannot read")));
    }

    #[test]
    fn test_configured_names_and_missing_account() {
        let (gateway, _, _) = gateway();
        assert_eq!(gateway.configured_names().collect::<Vec<_>>(), ["main-shop"]);

        let err = gateway.configured("other").unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[tokio::test]
    async fn test_configured_fetch_products() {
        let (gateway, transport, _) = gateway();
        transport.push_json(200, &json!({"products": [{"id": 1, "title": "Hat"}]}));

        let handle = gateway.configured("main-shop").unwrap();
        assert_eq!(handle.label(), Some("main-shop"));

        let products = handle.fetch_products().await.unwrap();
        assert_eq!(products[0].platform, Platform::Shopify);
        assert_eq!(products[0].title, "Hat");
    }

    #[tokio::test]
    async fn test_order_is_audited() {
        let (gateway, transport, sink) = gateway();
        transport.push_json(201, &json!({"order": {"id": 450_789_469}}));

        let handle = gateway.configured("main-shop").unwrap();
        handle.create_order(OrderRequest(json!({"line_items": []}))).await.unwrap();

        let events = sink.wait_for(1).await;
        assert_eq!(events[0].event_type, AuditEventType::OrderCreated);
        assert_eq!(events[0].label.as_deref(), Some("main-shop"));
        assert_eq!(events[0].details.order_id.as_deref(), Some("450789469"));
    }

    #[tokio::test]
    async fn test_refused_inventory_update_is_audited() {
        let (gateway, transport, sink) = gateway();

        let handle = gateway.configured("main-shop").unwrap();
        let err = handle.update_inventory("1", 5).await.unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(transport.request_count(), 0);

        let events = sink.wait_for(1).await;
        assert_eq!(events[0].event_type, AuditEventType::InventoryUpdateFailed);
        assert_eq!(events[0].details.product_id.as_deref(), Some("1"));
        assert_eq!(events[0].details.quantity, Some(5));
        assert!(events[0].details.error.as_deref().unwrap().contains("does not support"));
    }

    #[tokio::test]
    async fn test_explicit_platform_has_no_label() {
        let (gateway, transport, _) = gateway();
        transport.push_json(200, &json!([]));

        let config = PlatformConfig::new("woocommerce")
            .with_base_url("https://shop.example.com/wp-json/wc/v3")
            .with_basic_auth("ck", "cs");
        let handle = gateway.platform("woocommerce", &config).unwrap();

        assert_eq!(handle.label(), None);
        assert!(handle.fetch_products().await.unwrap().is_empty());
    }

    #[test]
    fn test_order_id_extraction() {
        assert_eq!(order_id(&json!({"id": 7})), Some("7".to_owned()));
        assert_eq!(order_id(&json!({"orderNo": "00001"})), Some("00001".to_owned()));
        assert_eq!(order_id(&json!({"data": {"id": "x"}})), Some("x".to_owned()));
        assert_eq!(order_id(&json!({"id": ""})), None);
        assert_eq!(order_id(&Value::Null), None);
    }
}
