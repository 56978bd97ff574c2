//! Static platform profiles.

use serde_json::{Value, json};

use super::{
    AuthScheme, BaseUrl, FieldSource, InventoryEndpoint, ListEndpoint, OrderEndpoint, Platform,
    PlatformProfile, ProductFields,
};
use crate::{platform::FieldSource::Pointer, transport::HttpMethod};

/// Extra lookup keys, already in canonical form (lowercase, no separators).
pub(super) const ALIASES: &[(&str, Platform)] = &[
    ("3dcart", Platform::Shift4Shop),
    ("hybris", Platform::SapHybris),
    ("sap", Platform::SapHybris),
    ("sapcommerce", Platform::SapHybris),
    ("salesforce", Platform::Sfcc),
    ("salesforcecommercecloud", Platform::Sfcc),
    ("demandware", Platform::Sfcc),
    ("zoho", Platform::ZohoCommerce),
    ("woo", Platform::WooCommerce),
    ("wcrest", Platform::WooCommerceRest),
    ("amazonsp", Platform::Amazon),
    ("lightspeedretail", Platform::Lightspeed),
];

pub(super) fn profile(platform: Platform) -> &'static PlatformProfile {
    match platform {
        Platform::Amazon => &AMAZON,
        Platform::BigCommerce => &BIGCOMMERCE,
        Platform::Lightspeed => &LIGHTSPEED,
        Platform::Magento => &MAGENTO,
        Platform::NetSuite => &NETSUITE,
        Platform::OpenCart => &OPENCART,
        Platform::PrestaShop => &PRESTASHOP,
        Platform::SapHybris => &SAP_HYBRIS,
        Platform::Sfcc => &SFCC,
        Platform::Shift4Shop => &SHIFT4SHOP,
        Platform::Shopify => &SHOPIFY,
        Platform::Squarespace => &SQUARESPACE,
        Platform::Weebly => &WEEBLY,
        Platform::Wix => &WIX,
        Platform::WooCommerce => &WOOCOMMERCE,
        Platform::WooCommerceRest => &WOOCOMMERCE_REST,
        Platform::ZohoCommerce => &ZOHO_COMMERCE,
    }
}

const ID: &[FieldSource] = &[Pointer("/id")];
const NAME: &[FieldSource] = &[Pointer("/name")];
const DESCRIPTION: &[FieldSource] = &[Pointer("/description")];
const PRICE: &[FieldSource] = &[Pointer("/price")];
const QUANTITY: &[FieldSource] = &[Pointer("/quantity")];
const STOCK: &[FieldSource] = &[Pointer("/stock")];
const STOCK_QUANTITY: &[FieldSource] = &[Pointer("/stock_quantity")];
const INVENTORY_LEVEL: &[FieldSource] = &[Pointer("/inventory_level")];

/// Flat records: `{id, name, description, price, <stock>}`.
const fn flat_fields(stock: &'static [FieldSource]) -> ProductFields {
    ProductFields { id: ID, title: NAME, description: DESCRIPTION, price: PRICE, stock }
}

const fn list(path: &'static str, items: &'static str) -> Option<ListEndpoint> {
    Some(ListEndpoint { method: HttpMethod::Get, path, body: None, items })
}

const fn post_order(path: &'static str) -> Option<OrderEndpoint> {
    Some(OrderEndpoint { method: HttpMethod::Post, path, wrap: None, unwrap: None })
}

const fn inventory(
    method: HttpMethod,
    path: &'static str,
    body: fn(u64) -> Value,
) -> Option<InventoryEndpoint> {
    Some(InventoryEndpoint { method, path, body })
}

static AMAZON: PlatformProfile = PlatformProfile {
    platform: Platform::Amazon,
    base_url: BaseUrl::Fixed("https://sellingpartnerapi-na.amazon.com"),
    auth: AuthScheme::TokenHeader("x-amz-access-token"),
    products: None,
    fields: flat_fields(QUANTITY),
    create_order: None,
    update_inventory: None,
};

static BIGCOMMERCE: PlatformProfile = PlatformProfile {
    platform: Platform::BigCommerce,
    base_url: BaseUrl::Store("https://api.bigcommerce.com/stores/{store}/v3"),
    auth: AuthScheme::TokenHeader("X-Auth-Token"),
    products: list("/catalog/products", "/data"),
    fields: flat_fields(INVENTORY_LEVEL),
    create_order: post_order("/orders"),
    update_inventory: inventory(HttpMethod::Put, "/catalog/products/{id}", |quantity| {
        json!({ "inventory_level": quantity })
    }),
};

static LIGHTSPEED: PlatformProfile = PlatformProfile {
    platform: Platform::Lightspeed,
    base_url: BaseUrl::Store("https://api.lightspeedapp.com/API/Account/{store}"),
    auth: AuthScheme::Bearer,
    products: list("/Product.json", "/Product"),
    fields: ProductFields {
        id: &[Pointer("/productID")],
        title: &[Pointer("/description")],
        description: &[Pointer("/longDescription")],
        price: &[Pointer("/DefaultSalePrice")],
        stock: &[Pointer("/QtyOnHand")],
    },
    create_order: post_order("/Sale.json"),
    update_inventory: inventory(HttpMethod::Put, "/Product/{id}.json", |quantity| {
        json!({ "QtyOnHand": quantity })
    }),
};

static MAGENTO: PlatformProfile = PlatformProfile {
    platform: Platform::Magento,
    base_url: BaseUrl::Configured { suffix: "/rest/V1" },
    auth: AuthScheme::Bearer,
    products: list("/products?searchCriteria[pageSize]=20", "/items"),
    fields: ProductFields {
        id: ID,
        title: NAME,
        description: &[FieldSource::Attribute {
            list: "/custom_attributes",
            key: "attribute_code",
            equals: "description",
            value: "value",
        }],
        price: PRICE,
        stock: &[Pointer("/extension_attributes/stock_item/qty")],
    },
    create_order: None,
    update_inventory: inventory(HttpMethod::Put, "/products/{id}/stockItems/1", |quantity| {
        json!({ "stockItem": { "qty": quantity, "is_in_stock": quantity > 0 } })
    }),
};

static NETSUITE: PlatformProfile = PlatformProfile {
    platform: Platform::NetSuite,
    base_url: BaseUrl::Configured { suffix: "" },
    auth: AuthScheme::Bearer,
    products: list("/inventoryItem", "/items"),
    fields: ProductFields {
        id: ID,
        title: &[Pointer("/displayName"), Pointer("/itemId")],
        description: DESCRIPTION,
        price: &[Pointer("/basePrice")],
        stock: &[Pointer("/quantityOnHand")],
    },
    create_order: post_order("/salesOrder"),
    update_inventory: inventory(HttpMethod::Patch, "/inventoryItem/{id}", |quantity| {
        json!({ "quantityOnHand": quantity })
    }),
};

static OPENCART: PlatformProfile = PlatformProfile {
    platform: Platform::OpenCart,
    base_url: BaseUrl::Configured { suffix: "" },
    auth: AuthScheme::HeaderPair { key_header: "X-Oc-Merchant-Id", token_header: "X-Oc-Session" },
    products: list("/products", "/data"),
    fields: ProductFields {
        id: &[Pointer("/product_id")],
        title: NAME,
        description: DESCRIPTION,
        price: PRICE,
        stock: QUANTITY,
    },
    create_order: post_order("/order/add"),
    update_inventory: inventory(HttpMethod::Put, "/product/{id}", |quantity| {
        json!({ "quantity": quantity })
    }),
};

static PRESTASHOP: PlatformProfile = PlatformProfile {
    platform: Platform::PrestaShop,
    base_url: BaseUrl::Configured { suffix: "" },
    auth: AuthScheme::BasicApiKey,
    products: list("/products?output_format=JSON", "/products"),
    fields: ProductFields {
        id: ID,
        title: &[Pointer("/name/0/value"), Pointer("/name")],
        description: &[Pointer("/description/0/value"), Pointer("/description")],
        price: PRICE,
        stock: QUANTITY,
    },
    create_order: post_order("/orders?output_format=JSON"),
    update_inventory: inventory(
        HttpMethod::Put,
        "/stock_availables/{id}?output_format=JSON",
        |quantity| json!({ "stock_available": { "quantity": quantity } }),
    ),
};

static SAP_HYBRIS: PlatformProfile = PlatformProfile {
    platform: Platform::SapHybris,
    base_url: BaseUrl::Configured { suffix: "" },
    auth: AuthScheme::Bearer,
    products: list("/products/search?pageSize=50", "/products"),
    fields: ProductFields {
        id: &[Pointer("/code")],
        title: NAME,
        description: &[Pointer("/summary"), Pointer("/description")],
        price: &[Pointer("/price/value")],
        stock: &[Pointer("/stock/stockLevel")],
    },
    create_order: post_order("/users/current/orders"),
    update_inventory: None,
};

static SFCC: PlatformProfile = PlatformProfile {
    platform: Platform::Sfcc,
    base_url: BaseUrl::Configured { suffix: "" },
    auth: AuthScheme::Bearer,
    products: list(
        "/products?start=0&count=50&select=id,name,short_description,long_description,price,inventory",
        "/data",
    ),
    fields: ProductFields {
        id: ID,
        title: NAME,
        description: &[Pointer("/short_description"), Pointer("/long_description")],
        price: &[Pointer("/price/amount"), Pointer("/price")],
        stock: &[Pointer("/inventory/available_to_sell")],
    },
    create_order: post_order("/orders"),
    update_inventory: inventory(HttpMethod::Patch, "/products/{id}/inventory", |quantity| {
        json!({ "available_to_sell": quantity })
    }),
};

static SHIFT4SHOP: PlatformProfile = PlatformProfile {
    platform: Platform::Shift4Shop,
    base_url: BaseUrl::Configured { suffix: "" },
    auth: AuthScheme::TokenHeader("Private-Token"),
    products: list("/products", ""),
    fields: flat_fields(STOCK),
    create_order: post_order("/orders"),
    update_inventory: inventory(HttpMethod::Put, "/products/{id}", |quantity| {
        json!({ "stock": quantity })
    }),
};

static SHOPIFY: PlatformProfile = PlatformProfile {
    platform: Platform::Shopify,
    base_url: BaseUrl::Store("https://{store}/admin/api/2023-01"),
    auth: AuthScheme::TokenHeader("X-Shopify-Access-Token"),
    products: list("/products.json", "/products"),
    fields: ProductFields {
        id: ID,
        title: &[Pointer("/title")],
        description: &[Pointer("/body_html")],
        price: &[Pointer("/variants/0/price")],
        stock: &[Pointer("/variants/0/inventory_quantity")],
    },
    create_order: Some(OrderEndpoint {
        method: HttpMethod::Post,
        path: "/orders.json",
        wrap: Some("order"),
        unwrap: Some("order"),
    }),
    // Stock lives on inventory levels keyed by inventory item and location
    update_inventory: None,
};

static SQUARESPACE: PlatformProfile = PlatformProfile {
    platform: Platform::Squarespace,
    base_url: BaseUrl::Fixed("https://api.squarespace.com/1.0/commerce"),
    auth: AuthScheme::Bearer,
    products: list("/products", "/products"),
    fields: ProductFields {
        id: ID,
        title: NAME,
        description: DESCRIPTION,
        price: &[Pointer("/variants/0/pricing/basePrice/value")],
        stock: &[Pointer("/variants/0/stock/quantity"), Pointer("/variants/0/stockLevel")],
    },
    create_order: None,
    update_inventory: None,
};

static WEEBLY: PlatformProfile = PlatformProfile {
    platform: Platform::Weebly,
    base_url: BaseUrl::Fixed("https://api.weebly.com/v3"),
    auth: AuthScheme::Bearer,
    products: list("/products", "/products"),
    fields: ProductFields {
        id: ID,
        title: NAME,
        description: DESCRIPTION,
        price: &[Pointer("/variants/0/price/amount"), Pointer("/variants/0/price")],
        stock: &[Pointer("/variants/0/inventory_quantity")],
    },
    create_order: None,
    update_inventory: None,
};

fn wix_query() -> Value {
    json!({ "query": {} })
}

static WIX: PlatformProfile = PlatformProfile {
    platform: Platform::Wix,
    base_url: BaseUrl::Fixed("https://www.wixapis.com/stores/v1"),
    auth: AuthScheme::TokenHeader("Authorization"),
    products: Some(ListEndpoint {
        method: HttpMethod::Post,
        path: "/products/query",
        body: Some(wix_query),
        items: "/products",
    }),
    fields: ProductFields {
        id: &[Pointer("/_id"), Pointer("/id")],
        title: NAME,
        description: DESCRIPTION,
        price: &[Pointer("/price/amount"), Pointer("/priceData/price")],
        stock: &[Pointer("/stock/quantity")],
    },
    create_order: None,
    update_inventory: inventory(HttpMethod::Patch, "/products/{id}/inventory", |quantity| {
        json!({ "inventory": { "quantity": quantity } })
    }),
};

static WOOCOMMERCE: PlatformProfile = PlatformProfile {
    platform: Platform::WooCommerce,
    base_url: BaseUrl::Configured { suffix: "" },
    auth: AuthScheme::Basic,
    products: list("/products", ""),
    fields: flat_fields(STOCK_QUANTITY),
    create_order: post_order("/orders"),
    update_inventory: inventory(HttpMethod::Put, "/products/{id}", |quantity| {
        json!({ "stock_quantity": quantity })
    }),
};

static WOOCOMMERCE_REST: PlatformProfile = PlatformProfile {
    platform: Platform::WooCommerceRest,
    base_url: BaseUrl::Configured { suffix: "" },
    auth: AuthScheme::Basic,
    products: list("/wp-json/wc/v3/products", ""),
    fields: flat_fields(STOCK_QUANTITY),
    create_order: post_order("/wp-json/wc/v3/orders"),
    update_inventory: inventory(HttpMethod::Put, "/wp-json/wc/v3/products/{id}", |quantity| {
        json!({ "stock_quantity": quantity })
    }),
};

static ZOHO_COMMERCE: PlatformProfile = PlatformProfile {
    platform: Platform::ZohoCommerce,
    base_url: BaseUrl::Store("https://commerce.zoho.com/store/api/v1/{store}"),
    auth: AuthScheme::PrefixedToken("Zoho-oauthtoken"),
    products: list("/products", "/products"),
    fields: ProductFields {
        id: &[Pointer("/product_id")],
        title: NAME,
        description: DESCRIPTION,
        price: PRICE,
        stock: &[Pointer("/stock_on_hand")],
    },
    create_order: post_order("/orders"),
    update_inventory: inventory(HttpMethod::Put, "/products/{id}", |quantity| {
        json!({ "stock_on_hand": quantity })
    }),
};
