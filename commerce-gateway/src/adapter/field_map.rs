//! Product field mapping.
//!
//! A [`FieldMapper`] answers "where is the price in this record?" for one platform. The
//! answer comes from the platform profile's candidate sources unless the configuration
//! overrides the field with its own JSON pointer.

use serde_json::Value;

use crate::platform::{
    FieldOverrides, FieldSource, Platform, ProductField, ProductFields, profile::is_present,
};

/// Reads normalized product fields out of platform records.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    fields: ProductFields,
    overrides: FieldOverrides,
}

impl FieldMapper {
    /// Creates a mapper from profile sources and configured overrides.
    #[must_use]
    pub fn new(fields: ProductFields, overrides: &FieldOverrides) -> Self {
        Self { fields, overrides: overrides.clone() }
    }

    /// Creates a mapper using only the platform's built-in sources.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self::new(platform.profile().fields, &FieldOverrides::default())
    }

    /// Reads a field from a record.
    ///
    /// An override replaces the built-in sources entirely. Otherwise the built-in sources
    /// are tried in order and the first present value wins. `null` and empty strings
    /// count as absent.
    #[must_use]
    pub fn read<'a>(&self, record: &'a Value, field: ProductField) -> Option<&'a Value> {
        if let Some(pointer) = self.overrides.get(field) {
            return record.pointer(pointer).filter(|value| is_present(value));
        }

        self.fields.sources(field).iter().find_map(|source: &FieldSource| source.read(record))
    }

    /// Returns true if any field is overridden by configuration.
    #[must_use]
    pub fn has_custom_mappings(&self) -> bool {
        ProductField::ALL.into_iter().any(|field| self.overrides.get(field).is_some())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builtin_sources() {
        let mapper = FieldMapper::for_platform(Platform::Shopify);
        let record = json!({
            "id": 1,
            "title": "Hat",
            "variants": [{"price": "12.50", "inventory_quantity": 4}]
        });

        assert_eq!(mapper.read(&record, ProductField::Id), Some(&json!(1)));
        assert_eq!(mapper.read(&record, ProductField::Price), Some(&json!("12.50")));
        assert_eq!(mapper.read(&record, ProductField::Stock), Some(&json!(4)));
        assert_eq!(mapper.read(&record, ProductField::Description), None);
        assert!(!mapper.has_custom_mappings());
    }

    #[test]
    fn test_first_present_candidate_wins() {
        let mapper = FieldMapper::for_platform(Platform::NetSuite);

        let with_display = json!({"displayName": "Widget", "itemId": "W-1"});
        assert_eq!(mapper.read(&with_display, ProductField::Title), Some(&json!("Widget")));

        let blank_display = json!({"displayName": "", "itemId": "W-1"});
        assert_eq!(mapper.read(&blank_display, ProductField::Title), Some(&json!("W-1")));

        let null_display = json!({"displayName": null, "itemId": "W-1"});
        assert_eq!(mapper.read(&null_display, ProductField::Title), Some(&json!("W-1")));
    }

    #[test]
    fn test_override_replaces_builtin_sources() {
        let overrides = FieldOverrides {
            title: Some("/attributes/label".to_owned()),
            ..FieldOverrides::default()
        };
        let mapper = FieldMapper::new(Platform::WooCommerce.profile().fields, &overrides);
        assert!(mapper.has_custom_mappings());

        let record = json!({"name": "Builtin", "attributes": {"label": "Override"}});
        assert_eq!(mapper.read(&record, ProductField::Title), Some(&json!("Override")));

        let missing = json!({"name": "Builtin"});
        assert_eq!(mapper.read(&missing, ProductField::Title), None);
    }

    #[test]
    fn test_magento_description_attribute() {
        let mapper = FieldMapper::for_platform(Platform::Magento);
        let record = json!({
            "custom_attributes": [{"attribute_code": "description", "value": "Soft cotton"}]
        });
        assert_eq!(mapper.read(&record, ProductField::Description), Some(&json!("Soft cotton")));
    }
}
