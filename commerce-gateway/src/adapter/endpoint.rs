//! Endpoint resolution.
//!
//! Resolves the request path for each operation from the platform profile, honoring
//! configured path overrides.

use crate::platform::{EndpointOverrides, InventoryEndpoint, ListEndpoint, OrderEndpoint};

/// Resolves operation paths for one platform account.
#[derive(Debug, Clone, Default)]
pub struct EndpointResolver {
    overrides: EndpointOverrides,
}

impl EndpointResolver {
    /// Creates a resolver with the given overrides.
    #[must_use]
    pub fn new(overrides: &EndpointOverrides) -> Self {
        Self { overrides: overrides.clone() }
    }

    /// Path of the product listing endpoint.
    #[must_use]
    pub fn products_path<'a>(&'a self, endpoint: &ListEndpoint) -> &'a str {
        self.overrides.products.as_deref().unwrap_or(endpoint.path)
    }

    /// Path of the order creation endpoint.
    #[must_use]
    pub fn orders_path<'a>(&'a self, endpoint: &OrderEndpoint) -> &'a str {
        self.overrides.orders.as_deref().unwrap_or(endpoint.path)
    }

    /// Path of the inventory endpoint for a product.
    ///
    /// `product_id` must already be validated.
    #[must_use]
    pub fn inventory_path(&self, endpoint: &InventoryEndpoint, product_id: &str) -> String {
        self.overrides
            .inventory
            .as_deref()
            .unwrap_or(endpoint.path)
            .replace("{id}", product_id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{platform::Platform, transport::HttpMethod};

    #[test]
    fn test_profile_paths() {
        let profile = Platform::BigCommerce.profile();
        let resolver = EndpointResolver::default();

        assert_eq!(resolver.products_path(&profile.products.unwrap()), "/catalog/products");
        assert_eq!(resolver.orders_path(&profile.create_order.unwrap()), "/orders");
        assert_eq!(
            resolver.inventory_path(&profile.update_inventory.unwrap(), "77"),
            "/catalog/products/77"
        );
    }

    #[test]
    fn test_overridden_paths() {
        let overrides = EndpointOverrides {
            products: Some("/v2/items".to_owned()),
            orders: Some("/v2/checkout".to_owned()),
            inventory: Some("/v2/items/{id}/stock".to_owned()),
        };
        let resolver = EndpointResolver::new(&overrides);
        let endpoint =
            InventoryEndpoint { method: HttpMethod::Put, path: "/products/{id}", body: |q| json!(q) };

        assert_eq!(resolver.inventory_path(&endpoint, "A-1"), "/v2/items/A-1/stock");

        let profile = Platform::WooCommerce.profile();
        assert_eq!(resolver.products_path(&profile.products.unwrap()), "/v2/items");
        assert_eq!(resolver.orders_path(&profile.create_order.unwrap()), "/v2/checkout");
    }
}
