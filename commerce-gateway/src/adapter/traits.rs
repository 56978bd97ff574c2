//! Uniform adapter interface.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{GatewayError, Result},
    normalize::NormalizedProduct,
    platform::{Capabilities, Capability, Platform},
};

/// Order payload in the target platform's native shape.
///
/// The gateway does not interpret orders; the payload is forwarded as-is (wrapped in an
/// envelope for platforms that expect one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRequest(pub Value);

impl OrderRequest {
    /// Returns the payload.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for OrderRequest {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Platform response to a mutating operation, in the platform's native shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderResult(pub Value);

impl OrderResult {
    /// Returns the response body.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Returns the response body by reference.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for OrderResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// The three uniform operations, implemented once per platform.
///
/// Operations a platform cannot perform return [`GatewayError::Unsupported`] without
/// touching the network. Implementations are shared behind `Arc<dyn Adapter>` and must
/// not hold per-call state.
#[async_trait]
pub trait Adapter: Send + Sync + fmt::Debug {
    /// Platform this adapter talks to.
    fn platform(&self) -> Platform;

    /// Operations this adapter will perform, after configuration overrides.
    fn capabilities(&self) -> Capabilities;

    /// Lists the platform's products in normalized form.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unsupported`] if the platform cannot list products, or a
    /// transport error if the call fails.
    async fn fetch_products(&self) -> Result<Vec<NormalizedProduct>>;

    /// Creates an order and returns the platform's response.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unsupported`] if the platform cannot create orders, or a
    /// transport error if the call fails.
    async fn create_order(&self, order: OrderRequest) -> Result<OrderResult>;

    /// Sets a product's stock level and returns the platform's response.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unsupported`] if the platform cannot update inventory,
    /// [`GatewayError::InvalidQuantity`] for a negative quantity,
    /// [`GatewayError::InvalidInput`] for an unusable product id, or a transport error if
    /// the call fails.
    async fn update_inventory(&self, product_id: &str, quantity: i64) -> Result<OrderResult>;

    /// Returns [`GatewayError::Unsupported`] unless the capability is available.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unsupported`] if the capability is missing.
    fn require(&self, capability: Capability) -> Result<()> {
        if self.capabilities().supports(capability) {
            Ok(())
        } else {
            Err(GatewayError::Unsupported { platform: self.platform(), capability })
        }
    }
}

/// Checks an inventory quantity.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidQuantity`] if the quantity is negative.
pub fn validate_quantity(quantity: i64) -> Result<u64> {
    u64::try_from(quantity).map_err(|_| GatewayError::InvalidQuantity(quantity))
}

/// Checks that a product id can be substituted into a request path.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] if the id is empty, is a dot segment or contains
/// path separators, traversal sequences, percent escapes or control characters. Query and
/// fragment delimiters are rejected too.
pub fn validate_product_id(product_id: &str) -> Result<&str> {
    if product_id.trim().is_empty() {
        return Err(GatewayError::InvalidInput("product id cannot be empty".to_owned()));
    }
    // URL parsing decodes `%2e` before resolving dot segments.
    if product_id.contains("..") || product_id == "." {
        return Err(GatewayError::InvalidInput(format!(
            "product id contains traversal sequence: {product_id:?}"
        )));
    }
    if let Some(ch) = product_id
        .chars()
        .find(|ch| matches!(ch, '/' | '\\' | '?' | '#' | '%') || ch.is_control())
    {
        return Err(GatewayError::InvalidInput(format!(
            "product id contains invalid character {ch:?}: {product_id:?}"
        )));
    }
    Ok(product_id)
}
