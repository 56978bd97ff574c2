//! Product normalization.
//!
//! Platform catalogs disagree on almost everything: where the record array lives, what
//! the id field is called, whether prices are strings or numbers. This module turns one
//! platform response into [`NormalizedProduct`]s using the field sources from the
//! platform profile (and any configured overrides).
//!
//! Normalization never fails. A record with a missing field gets the default for that
//! field (empty string, zero price, zero stock). A record with a present but unusable
//! field (a negative price, a stock of `"lots"`) gets the same default and is reported as
//! a [`MalformedRecord`] through `tracing`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{
    adapter::FieldMapper,
    platform::{Platform, ProductField},
};

#[cfg(test)]
mod tests;

/// A product in the gateway's uniform shape.
///
/// # Examples
///
/// ```
/// use commerce_gateway::{normalize::NormalizedProduct, platform::Platform};
/// use rust_decimal::Decimal;
///
/// let product = NormalizedProduct {
///     platform: Platform::Shopify,
///     id: "632910392".to_owned(),
///     title: "IPod Nano - 8GB".to_owned(),
///     description: String::new(),
///     price: Decimal::new(19900, 2),
///     stock: 10,
/// };
///
/// assert_eq!(product.price.to_string(), "199.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    /// Platform the product was fetched from.
    pub platform: Platform,
    /// Platform-native identifier, rendered as a string.
    pub id: String,
    /// Product title.
    pub title: String,
    /// Product description, possibly HTML.
    pub description: String,
    /// Unit price; never negative.
    pub price: Decimal,
    /// Units in stock.
    pub stock: u64,
}

/// Diagnostic for a record whose fields could not all be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Position of the record in the platform's list.
    pub index: usize,
    /// Identifier of the record, if one could be read.
    pub id: String,
    /// Fields that were present but unusable and fell back to their defaults.
    pub fields: Vec<ProductField>,
}

/// Normalizes a product listing response.
///
/// `items` is a JSON pointer to the record array (`""` when the response is the array
/// itself). A response without an array at that location yields an empty list and a
/// warning, since several platforms answer an empty catalog with `{}` or `null`.
pub fn normalize_products(
    platform: Platform,
    body: &Value,
    items: &str,
    mapper: &FieldMapper,
) -> Vec<NormalizedProduct> {
    let Some(records) = body.pointer(items).and_then(Value::as_array) else {
        warn!(%platform, items, "product listing did not contain a record array");
        return Vec::new();
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let (product, malformed) = normalize_record(platform, index, record, mapper);
            if let Some(malformed) = malformed {
                warn!(
                    %platform,
                    index = malformed.index,
                    id = %malformed.id,
                    fields = ?malformed.fields,
                    "MalformedRecord: fields replaced with defaults"
                );
            }
            product
        })
        .collect()
}

/// Normalizes one record, returning a diagnostic when any present field was unusable.
pub fn normalize_record(
    platform: Platform,
    index: usize,
    record: &Value,
    mapper: &FieldMapper,
) -> (NormalizedProduct, Option<MalformedRecord>) {
    let mut bad = Vec::new();

    let mut text = |field: ProductField| match mapper.read(record, field) {
        None => String::new(),
        Some(value) => coerce_text(value).unwrap_or_else(|| {
            bad.push(field);
            String::new()
        }),
    };

    let id = text(ProductField::Id);
    let title = text(ProductField::Title);
    let description = text(ProductField::Description);

    let price = match mapper.read(record, ProductField::Price) {
        None => Decimal::ZERO,
        Some(value) => coerce_price(value).unwrap_or_else(|| {
            bad.push(ProductField::Price);
            Decimal::ZERO
        }),
    };

    let stock = match mapper.read(record, ProductField::Stock) {
        None => 0,
        Some(value) => coerce_stock(value).unwrap_or_else(|| {
            bad.push(ProductField::Stock);
            0
        }),
    };

    let malformed =
        (!bad.is_empty()).then(|| MalformedRecord { index, id: id.clone(), fields: bad });

    (NormalizedProduct { platform, id, title, description, price, stock }, malformed)
}

/// Renders scalars as text; arrays and objects are unusable.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses a price from a JSON number or numeric string. Negative prices are unusable.
pub fn coerce_price(value: &Value) -> Option<Decimal> {
    let price = match value {
        Value::Number(n) => parse_decimal(&n.to_string())?,
        Value::String(s) => parse_decimal(s.trim())?,
        _ => return None,
    };
    (!price.is_sign_negative() || price.is_zero()).then(|| price.abs())
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)).ok()
}

/// Parses a stock level. Negative and fractional quantities are unusable.
pub fn coerce_stock(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| whole_non_negative(n.as_f64()?)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| whole_non_negative(s.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "value is checked to be a whole, non-negative number within u64 range"
)]
fn whole_non_negative(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64)
        .then_some(value as u64)
}
