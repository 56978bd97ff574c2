use rust_decimal::Decimal;
use serde_json::{Value, json};

use super::*;
use crate::platform::FieldOverrides;


fn normalize(platform: Platform, body: &Value) -> Vec<NormalizedProduct> {
    let items = platform.profile().products.map_or("", |endpoint| endpoint.items);
    normalize_products(platform, body, items, &FieldMapper::for_platform(platform))
}

#[test]
fn test_shopify_listing() {
    let body = json!({"products": [
        {
            "id": 632_910_392,
            "title": "IPod Nano - 8GB",
            "body_html": "<p>It's the small iPod with one very big idea.</p>",
            "variants": [{"price": "199.00", "inventory_quantity": 10}]
        },
        {
            "id": 921_728_736,
            "title": "IPod Touch 8GB",
            "variants": [{"price": "199.00", "inventory_quantity": 13}]
        }
    ]});

    let products = normalize(Platform::Shopify, &body);
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, "632910392");
    assert_eq!(products[0].title, "IPod Nano - 8GB");
    assert!(products[0].description.starts_with("<p>"));
    assert_eq!(products[0].price, Decimal::new(19900, 2));
    assert_eq!(products[0].stock, 10);
    assert_eq!(products[1].description, "");
    assert!(products.iter().all(|p| p.platform == Platform::Shopify));
}

#[test]
fn test_missing_fields_use_defaults() {
    let products = normalize(Platform::BigCommerce, &json!({"data": [{"id": 77}]}));

    assert_eq!(
        products,
        [NormalizedProduct {
            platform: Platform::BigCommerce,
            id: "77".to_owned(),
            title: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            stock: 0,
        }]
    );
}

#[test]
fn test_empty_listing() {
    assert!(normalize(Platform::Squarespace, &json!({"products": []})).is_empty());
}

#[test]
fn test_listing_without_array() {
    assert!(normalize(Platform::Squarespace, &json!({"result": "ok"})).is_empty());
    assert!(normalize(Platform::Squarespace, &json!({"products": {"id": 1}})).is_empty());
    assert!(normalize(Platform::WooCommerce, &Value::Null).is_empty());
}

#[test]
fn test_root_array_listing() {
    let body = json!([
        {"id": 12, "name": "Beanie", "price": "18", "stock_quantity": 4},
        {"id": 13, "name": "Scarf", "price": 25.5, "stock_quantity": null}
    ]);

    let products = normalize(Platform::WooCommerce, &body);
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price, Decimal::new(18, 0));
    assert_eq!(products[1].price, Decimal::new(255, 1));
    assert_eq!(products[1].stock, 0);
}

#[test]
fn test_prestashop_localized_text() {
    let body = json!({"products": [{
        "id": 1,
        "name": [{"id": "1", "value": "Hummingbird T-shirt"}],
        "description": [{"id": "1", "value": "<p>Regular fit</p>"}],
        "price": "23.900000",
        "quantity": "300"
    }]});

    let products = normalize(Platform::PrestaShop, &body);
    assert_eq!(products[0].title, "Hummingbird T-shirt");
    assert_eq!(products[0].description, "<p>Regular fit</p>");
    assert_eq!(products[0].price, Decimal::new(239, 1));
    assert_eq!(products[0].stock, 300);
}

#[test]
fn test_magento_nested_stock() {
    let body = json!({"items": [{
        "id": 1,
        "sku": "24-MB01",
        "name": "Joust Duffle Bag",
        "price": 34,
        "custom_attributes": [
            {"attribute_code": "url_key", "value": "joust-duffle-bag"},
            {"attribute_code": "description", "value": "<p>The sporty Joust Duffle Bag</p>"}
        ],
        "extension_attributes": {"stock_item": {"qty": 100}}
    }]});

    let products = normalize(Platform::Magento, &body);
    assert_eq!(products[0].description, "<p>The sporty Joust Duffle Bag</p>");
    assert_eq!(products[0].price, Decimal::new(34, 0));
    assert_eq!(products[0].stock, 100);
}

#[test]
fn test_malformed_fields_reported() {
    let mapper = FieldMapper::for_platform(Platform::WooCommerce);
    let record = json!({
        "id": 5,
        "name": ["not", "text"],
        "price": "-3.00",
        "stock_quantity": "lots"
    });

    let (product, malformed) = normalize_record(Platform::WooCommerce, 4, &record, &mapper);
    assert_eq!(product.title, "");
    assert_eq!(product.price, Decimal::ZERO);
    assert_eq!(product.stock, 0);

    let malformed = malformed.unwrap();
    assert_eq!(malformed.index, 4);
    assert_eq!(malformed.id, "5");
    assert_eq!(
        malformed.fields,
        [ProductField::Title, ProductField::Price, ProductField::Stock]
    );
}

#[test]
fn test_clean_record_has_no_diagnostic() {
    let mapper = FieldMapper::for_platform(Platform::WooCommerce);
    let record = json!({"id": 5, "name": "Cap", "price": "9.99", "stock_quantity": 1});

    let (_, malformed) = normalize_record(Platform::WooCommerce, 0, &record, &mapper);
    assert!(malformed.is_none());
}

#[test]
fn test_field_override() {
    let overrides = FieldOverrides {
        price: Some("/prices/retail".to_owned()),
        ..FieldOverrides::default()
    };
    let mapper = FieldMapper::new(Platform::Shift4Shop.profile().fields, &overrides);
    let body = json!([{"id": 1, "name": "Mug", "price": 1, "prices": {"retail": "12.00"}}]);

    let products = normalize_products(Platform::Shift4Shop, &body, "", &mapper);
    assert_eq!(products[0].price, Decimal::new(1200, 2));
}

#[test]
fn test_coerce_text() {
    assert_eq!(coerce_text(&json!("Hat")).as_deref(), Some("Hat"));
    assert_eq!(coerce_text(&json!(12)).as_deref(), Some("12"));
    assert_eq!(coerce_text(&json!(true)).as_deref(), Some("true"));
    assert_eq!(coerce_text(&Value::Null).as_deref(), Some(""));
    assert_eq!(coerce_text(&json!({"a": 1})), None);
    assert_eq!(coerce_text(&json!([1])), None);
}

#[test]
fn test_coerce_price() {
    assert_eq!(coerce_price(&json!("19.99")), Some(Decimal::new(1999, 2)));
    assert_eq!(coerce_price(&json!(" 5 ")), Some(Decimal::new(5, 0)));
    assert_eq!(coerce_price(&json!(19.99)), Some(Decimal::new(1999, 2)));
    assert_eq!(coerce_price(&json!(0)), Some(Decimal::ZERO));
    assert_eq!(coerce_price(&json!("1e2")), Some(Decimal::new(100, 0)));
    assert_eq!(coerce_price(&json!("-0")), Some(Decimal::ZERO));
    assert_eq!(coerce_price(&json!("-1")), None);
    assert_eq!(coerce_price(&json!(-0.01)), None);
    assert_eq!(coerce_price(&json!("free")), None);
    assert_eq!(coerce_price(&json!(false)), None);
}

#[test]
fn test_coerce_stock() {
    assert_eq!(coerce_stock(&json!(5)), Some(5));
    assert_eq!(coerce_stock(&json!("7")), Some(7));
    assert_eq!(coerce_stock(&json!(3.0)), Some(3));
    assert_eq!(coerce_stock(&json!("3.0")), Some(3));
    assert_eq!(coerce_stock(&json!(2.5)), None);
    assert_eq!(coerce_stock(&json!(-1)), None);
    assert_eq!(coerce_stock(&json!("lots")), None);
    assert_eq!(coerce_stock(&json!(null)), None);
}
