//! Supported commerce platforms and their capabilities.
//!
//! The set of platforms is closed and known at build time: every [`Platform`] variant has
//! exactly one [`PlatformProfile`] in the static profile table, which describes how to
//! reach the platform, how to authenticate, and which operations its public API supports.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

pub mod config;
pub mod profile;
mod table;

pub use config::{CapabilityOverrides, EndpointOverrides, FieldOverrides, PlatformConfig, Secret};
pub use profile::{
    AuthScheme, BaseUrl, FieldSource, InventoryEndpoint, ListEndpoint, OrderEndpoint,
    PlatformProfile, ProductField, ProductFields,
};

/// A commerce platform the gateway can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    /// Amazon Selling Partner API.
    #[serde(rename = "amazon")]
    Amazon,
    /// BigCommerce v3 catalog API.
    #[serde(rename = "bigcommerce")]
    BigCommerce,
    /// Lightspeed Retail.
    #[serde(rename = "lightspeed")]
    Lightspeed,
    /// Magento 2 REST API.
    #[serde(rename = "magento")]
    Magento,
    /// Oracle NetSuite SuiteTalk REST.
    #[serde(rename = "netsuite")]
    NetSuite,
    /// OpenCart REST API module.
    #[serde(rename = "opencart")]
    OpenCart,
    /// PrestaShop webservice.
    #[serde(rename = "prestashop")]
    PrestaShop,
    /// SAP Commerce (Hybris) OCC API.
    #[serde(rename = "sap-hybris")]
    SapHybris,
    /// Salesforce Commerce Cloud OCAPI.
    #[serde(rename = "sfcc")]
    Sfcc,
    /// Shift4Shop (formerly 3dcart).
    #[serde(rename = "shift4shop")]
    Shift4Shop,
    /// Shopify Admin API.
    #[serde(rename = "shopify")]
    Shopify,
    /// Squarespace Commerce API (read-only).
    #[serde(rename = "squarespace")]
    Squarespace,
    /// Weebly v3 API.
    #[serde(rename = "weebly")]
    Weebly,
    /// Wix Stores API.
    #[serde(rename = "wix")]
    Wix,
    /// WooCommerce with a caller-supplied API base.
    #[serde(rename = "woocommerce")]
    WooCommerce,
    /// WooCommerce addressed through the `/wp-json/wc/v3` REST prefix.
    #[serde(rename = "woocommerce-rest")]
    WooCommerceRest,
    /// Zoho Commerce.
    #[serde(rename = "zoho-commerce")]
    ZohoCommerce,
}

impl Platform {
    /// Every supported platform, in registry order.
    pub const ALL: [Self; 17] = [
        Self::Amazon,
        Self::BigCommerce,
        Self::Lightspeed,
        Self::Magento,
        Self::NetSuite,
        Self::OpenCart,
        Self::PrestaShop,
        Self::SapHybris,
        Self::Sfcc,
        Self::Shift4Shop,
        Self::Shopify,
        Self::Squarespace,
        Self::Weebly,
        Self::Wix,
        Self::WooCommerce,
        Self::WooCommerceRest,
        Self::ZohoCommerce,
    ];

    /// Stable machine identifier, as used in configuration files.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Amazon => "amazon",
            Self::BigCommerce => "bigcommerce",
            Self::Lightspeed => "lightspeed",
            Self::Magento => "magento",
            Self::NetSuite => "netsuite",
            Self::OpenCart => "opencart",
            Self::PrestaShop => "prestashop",
            Self::SapHybris => "sap-hybris",
            Self::Sfcc => "sfcc",
            Self::Shift4Shop => "shift4shop",
            Self::Shopify => "shopify",
            Self::Squarespace => "squarespace",
            Self::Weebly => "weebly",
            Self::Wix => "wix",
            Self::WooCommerce => "woocommerce",
            Self::WooCommerceRest => "woocommerce-rest",
            Self::ZohoCommerce => "zoho-commerce",
        }
    }

    /// Human-readable platform name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Amazon => "Amazon",
            Self::BigCommerce => "BigCommerce",
            Self::Lightspeed => "Lightspeed",
            Self::Magento => "Magento",
            Self::NetSuite => "NetSuite",
            Self::OpenCart => "OpenCart",
            Self::PrestaShop => "PrestaShop",
            Self::SapHybris => "SAP Hybris",
            Self::Sfcc => "Salesforce Commerce Cloud",
            Self::Shift4Shop => "Shift4Shop",
            Self::Shopify => "Shopify",
            Self::Squarespace => "Squarespace",
            Self::Weebly => "Weebly",
            Self::Wix => "Wix",
            Self::WooCommerce => "WooCommerce",
            Self::WooCommerceRest => "WooCommerce REST",
            Self::ZohoCommerce => "Zoho Commerce",
        }
    }

    /// Returns the static profile describing this platform's API.
    #[must_use]
    pub fn profile(self) -> &'static PlatformProfile {
        table::profile(self)
    }

    /// Returns the capabilities declared by this platform's profile.
    #[must_use]
    pub fn capabilities(self) -> Capabilities {
        self.profile().capabilities()
    }

    /// Resolves a platform from a user-supplied name.
    ///
    /// Matching ignores ASCII case, spaces, dashes, underscores and dots, and accepts a few
    /// well-known aliases (`"Salesforce Commerce Cloud"`, `"3dcart"`, `"WooCommerce REST"`).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownPlatform`] if no platform matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use commerce_gateway::platform::Platform;
    ///
    /// assert_eq!(Platform::lookup("Shopify").unwrap(), Platform::Shopify);
    /// assert_eq!(Platform::lookup("SAP Hybris").unwrap(), Platform::SapHybris);
    /// assert!(Platform::lookup("etsy").is_err());
    /// ```
    pub fn lookup(name: &str) -> Result<Self, GatewayError> {
        let key = canonical_name(name);
        if key.is_empty() {
            return Err(GatewayError::UnknownPlatform(name.to_owned()));
        }

        Self::ALL
            .into_iter()
            .find(|platform| canonical_name(platform.id()) == key)
            .or_else(|| {
                table::ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == key)
                    .map(|(_, platform)| *platform)
            })
            .ok_or_else(|| GatewayError::UnknownPlatform(name.to_owned()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

/// Lowercases and strips separators so that "Zoho Commerce", "zoho-commerce" and
/// "zoho_commerce" compare equal.
fn canonical_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '.'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A single uniform gateway operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// List the platform's product catalog.
    FetchProducts,
    /// Create an order on the platform.
    CreateOrder,
    /// Set a product's stock level.
    UpdateInventory,
}

impl Capability {
    /// Every capability.
    pub const ALL: [Self; 3] = [Self::FetchProducts, Self::CreateOrder, Self::UpdateInventory];

    /// Returns the snake-case name of the capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchProducts => "fetch_products",
            Self::CreateOrder => "create_order",
            Self::UpdateInventory => "update_inventory",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability flags for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    /// Products can be listed.
    pub fetch_products: bool,
    /// Orders can be created.
    pub create_order: bool,
    /// Inventory can be updated.
    pub update_inventory: bool,
}

impl Capabilities {
    /// All operations supported.
    pub const ALL: Self = Self::new(true, true, true);

    /// No operation supported.
    pub const NONE: Self = Self::new(false, false, false);

    /// Only product listing supported.
    pub const READ_ONLY: Self = Self::new(true, false, false);

    /// Creates a capability set from individual flags.
    #[must_use]
    pub const fn new(fetch_products: bool, create_order: bool, update_inventory: bool) -> Self {
        Self { fetch_products, create_order, update_inventory }
    }

    /// Returns true if the given capability is supported.
    #[must_use]
    pub const fn supports(self, capability: Capability) -> bool {
        match capability {
            Capability::FetchProducts => self.fetch_products,
            Capability::CreateOrder => self.create_order,
            Capability::UpdateInventory => self.update_inventory,
        }
    }

    /// Narrows this set with caller overrides.
    ///
    /// Overrides can only switch capabilities off: a platform whose API cannot create
    /// orders does not gain that ability because configuration says so.
    #[must_use]
    pub fn restrict(self, overrides: &CapabilityOverrides) -> Self {
        Self {
            fetch_products: self.fetch_products && overrides.fetch_products.unwrap_or(true),
            create_order: self.create_order && overrides.create_order.unwrap_or(true),
            update_inventory: self.update_inventory && overrides.update_inventory.unwrap_or(true),
        }
    }

    /// Iterates over the supported capabilities.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |capability| self.supports(*capability))
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Capability::as_str).collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        for platform in Platform::ALL {
            assert_eq!(Platform::lookup(platform.id()).unwrap(), platform);
        }
    }

    #[test]
    fn test_lookup_by_display_name() {
        for platform in Platform::ALL {
            assert_eq!(Platform::lookup(platform.display_name()).unwrap(), platform);
        }
    }

    #[test]
    fn test_lookup_ignores_case_and_separators() {
        assert_eq!(Platform::lookup("WOO_COMMERCE").unwrap(), Platform::WooCommerce);
        assert_eq!(Platform::lookup("woo-commerce rest").unwrap(), Platform::WooCommerceRest);
        assert_eq!(Platform::lookup(" Zoho Commerce ").unwrap(), Platform::ZohoCommerce);
    }

    #[test]
    fn test_lookup_aliases() {
        assert_eq!(Platform::lookup("3dcart").unwrap(), Platform::Shift4Shop);
        assert_eq!(Platform::lookup("hybris").unwrap(), Platform::SapHybris);
        assert_eq!(Platform::lookup("zoho").unwrap(), Platform::ZohoCommerce);
    }

    #[test]
    fn test_lookup_unknown() {
        let err = Platform::lookup("etsy").unwrap_err();
        assert!(matches!(err, GatewayError::UnknownPlatform(name) if name == "etsy"));
    }

    #[test]
    fn test_lookup_empty_name() {
        assert!(matches!(Platform::lookup(" - "), Err(GatewayError::UnknownPlatform(_))));
    }

    #[test]
    fn test_from_str() {
        let platform: Platform = "bigcommerce".parse().unwrap();
        assert_eq!(platform, Platform::BigCommerce);
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&Platform::SapHybris).unwrap();
        assert_eq!(json, "\"sap-hybris\"");

        let parsed: Platform = serde_json::from_str("\"woocommerce-rest\"").unwrap();
        assert_eq!(parsed, Platform::WooCommerceRest);
    }

    #[test]
    fn test_capabilities_restrict_only_narrows() {
        let overrides = CapabilityOverrides {
            fetch_products: None,
            create_order: Some(false),
            update_inventory: Some(true),
        };

        let narrowed = Capabilities::ALL.restrict(&overrides);
        assert_eq!(narrowed, Capabilities::new(true, false, true));

        let read_only = Capabilities::READ_ONLY.restrict(&CapabilityOverrides {
            fetch_products: Some(true),
            create_order: Some(true),
            update_inventory: Some(true),
        });
        assert_eq!(read_only, Capabilities::READ_ONLY);
    }

    #[test]
    fn test_capabilities_display() {
        assert_eq!(Capabilities::ALL.to_string(), "fetch_products,create_order,update_inventory");
        assert_eq!(Capabilities::READ_ONLY.to_string(), "fetch_products");
        assert_eq!(Capabilities::NONE.to_string(), "none");
    }

    #[test]
    fn test_capabilities_iter() {
        let supported: Vec<_> = Capabilities::new(true, false, true).iter().collect();
        assert_eq!(supported, vec![Capability::FetchProducts, Capability::UpdateInventory]);
    }
}
