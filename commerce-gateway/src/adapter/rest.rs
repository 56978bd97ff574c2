//! Profile-driven REST adapter.
//!
//! Every supported platform is served by [`PlatformAdapter`]; what differs between
//! platforms is data, held in the static [`PlatformProfile`] table.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::{
    adapter::{
        Adapter, EndpointResolver, FieldMapper, OrderRequest, OrderResult, validate_product_id,
        validate_quantity,
    },
    client::PlatformClient,
    error::{GatewayError, Result},
    normalize::{NormalizedProduct, normalize_products},
    platform::{Capabilities, Capability, Platform, PlatformConfig, PlatformProfile},
    transport::Transport,
};

/// Adapter for any platform in the profile table.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use commerce_gateway::{
///     adapter::{Adapter, PlatformAdapter},
///     platform::{Capability, Platform, PlatformConfig},
///     transport::HttpTransport,
/// };
///
/// let config = PlatformConfig::new("squarespace").with_access_token("tok");
/// let transport = Arc::new(HttpTransport::new().unwrap());
///
/// let adapter = PlatformAdapter::new(Platform::Squarespace, &config, transport).unwrap();
/// assert!(adapter.capabilities().supports(Capability::FetchProducts));
/// assert!(!adapter.capabilities().supports(Capability::CreateOrder));
/// ```
#[derive(Debug)]
pub struct PlatformAdapter {
    profile: &'static PlatformProfile,
    capabilities: Capabilities,
    client: PlatformClient,
    endpoints: EndpointResolver,
    fields: FieldMapper,
}

impl PlatformAdapter {
    /// Builds an adapter from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the configuration fails validation or lacks the
    /// store, base URL or credentials the platform needs.
    pub fn new(
        platform: Platform,
        config: &PlatformConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        config.validate()?;

        let profile = platform.profile();
        let client = PlatformClient::connect(platform, config, transport)?;
        let capabilities = profile.capabilities().restrict(&config.capabilities);

        debug!(%platform, base_url = client.base_url(), %capabilities, "adapter constructed");

        Ok(Self {
            profile,
            capabilities,
            client,
            endpoints: EndpointResolver::new(&config.endpoints),
            fields: FieldMapper::new(profile.fields, &config.field_mappings),
        })
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &PlatformClient {
        &self.client
    }

    fn unsupported(&self, capability: Capability) -> GatewayError {
        GatewayError::Unsupported { platform: self.profile.platform, capability }
    }
}

fn wrap_envelope(payload: Value, key: Option<&str>) -> Value {
    match key {
        Some(key) => {
            let mut envelope = Map::new();
            envelope.insert(key.to_owned(), payload);
            Value::Object(envelope)
        }
        None => payload,
    }
}

/// Takes `key` out of an object response; any other response is returned whole.
fn unwrap_envelope(response: Value, key: Option<&str>) -> Value {
    match (key, response) {
        (Some(key), Value::Object(mut map)) => match map.remove(key) {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        (_, response) => response,
    }
}

#[async_trait]
impl Adapter for PlatformAdapter {
    fn platform(&self) -> Platform {
        self.profile.platform
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[instrument(skip(self), fields(platform = %self.profile.platform))]
    async fn fetch_products(&self) -> Result<Vec<NormalizedProduct>> {
        self.require(Capability::FetchProducts)?;
        let endpoint =
            self.profile.products.ok_or_else(|| self.unsupported(Capability::FetchProducts))?;

        let body = endpoint.body.map(|build| build());
        let response = self
            .client
            .request(endpoint.method, self.endpoints.products_path(&endpoint), body.as_ref())
            .await?;

        let products = normalize_products(self.profile.platform, &response, endpoint.items, &self.fields);
        info!(count = products.len(), "products fetched");
        Ok(products)
    }

    #[instrument(skip(self, order), fields(platform = %self.profile.platform))]
    async fn create_order(&self, order: OrderRequest) -> Result<OrderResult> {
        self.require(Capability::CreateOrder)?;
        let endpoint =
            self.profile.create_order.ok_or_else(|| self.unsupported(Capability::CreateOrder))?;

        let payload = wrap_envelope(order.into_inner(), endpoint.wrap);
        let response = self
            .client
            .request(endpoint.method, self.endpoints.orders_path(&endpoint), Some(&payload))
            .await?;

        info!("order created");
        Ok(OrderResult(unwrap_envelope(response, endpoint.unwrap)))
    }

    #[instrument(skip(self), fields(platform = %self.profile.platform))]
    async fn update_inventory(&self, product_id: &str, quantity: i64) -> Result<OrderResult> {
        self.require(Capability::UpdateInventory)?;
        let quantity = validate_quantity(quantity)?;
        let product_id = validate_product_id(product_id)?;
        let endpoint = self
            .profile
            .update_inventory
            .ok_or_else(|| self.unsupported(Capability::UpdateInventory))?;

        let path = self.endpoints.inventory_path(&endpoint, product_id);
        let payload = (endpoint.body)(quantity);
        let response = self.client.request(endpoint.method, &path, Some(&payload)).await?;

        info!(quantity, "inventory updated");
        Ok(OrderResult(response))
    }
}
