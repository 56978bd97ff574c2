//! Platform profile types.
//!
//! A [`PlatformProfile`] is the static description of one platform's REST surface: where
//! it lives, how requests authenticate, which endpoints back each gateway operation and
//! where product fields sit inside the platform's JSON records.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;

use crate::{
    error::{GatewayError, Result},
    platform::{Capabilities, Platform, PlatformConfig, Secret},
    transport::HttpMethod,
};

/// Static description of a platform's API.
#[derive(Debug)]
pub struct PlatformProfile {
    /// Platform this profile describes.
    pub platform: Platform,
    /// How the API base URL is derived.
    pub base_url: BaseUrl,
    /// How requests authenticate.
    pub auth: AuthScheme,
    /// Product listing endpoint, if the API can list products.
    pub products: Option<ListEndpoint>,
    /// Where product fields live inside each listed record.
    pub fields: ProductFields,
    /// Order creation endpoint, if the API can create orders.
    pub create_order: Option<OrderEndpoint>,
    /// Inventory update endpoint, if the API can update stock.
    pub update_inventory: Option<InventoryEndpoint>,
}

impl PlatformProfile {
    /// Capabilities implied by which endpoints the profile declares.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        Capabilities::new(
            self.products.is_some(),
            self.create_order.is_some(),
            self.update_inventory.is_some(),
        )
    }
}

/// How a platform's API base URL is derived from configuration.
#[derive(Debug, Clone, Copy)]
pub enum BaseUrl {
    /// Single public endpoint shared by all accounts.
    Fixed(&'static str),
    /// Hosted endpoint parameterized by the store identifier (`{store}` placeholder).
    Store(&'static str),
    /// Self-hosted endpoint: the configured `base_url` followed by a fixed suffix.
    Configured {
        /// Path appended to the configured base URL.
        suffix: &'static str,
    },
}

impl BaseUrl {
    /// Resolves the base URL for a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the configuration lacks the store identifier
    /// or base URL this scheme needs.
    pub fn resolve(&self, platform: Platform, config: &PlatformConfig) -> Result<String> {
        match *self {
            Self::Fixed(url) => Ok(url.to_owned()),
            Self::Store(template) => {
                let store = config.store.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
                    GatewayError::Config(format!("{} requires a store identifier", platform.id()))
                })?;
                Ok(template.replace("{store}", store))
            }
            Self::Configured { suffix } => {
                let base =
                    config.base_url.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
                        GatewayError::Config(format!("{} requires base_url", platform.id()))
                    })?;
                Ok(format!("{}{suffix}", base.trim_end_matches('/')))
            }
        }
    }
}

/// How requests to a platform authenticate.
#[derive(Debug, Clone, Copy)]
pub enum AuthScheme {
    /// `Authorization: Bearer <access_token>`.
    Bearer,
    /// Access token sent verbatim in the named header.
    TokenHeader(&'static str),
    /// `Authorization: <prefix> <access_token>`.
    PrefixedToken(&'static str),
    /// API key and access token sent in two separate headers.
    HeaderPair {
        /// Header carrying `api_key`.
        key_header: &'static str,
        /// Header carrying `access_token`.
        token_header: &'static str,
    },
    /// HTTP basic auth with `username` and `password`.
    Basic,
    /// HTTP basic auth with `api_key` as the user name and an empty password.
    BasicApiKey,
}

impl AuthScheme {
    /// Builds the authentication headers for a configuration.
    ///
    /// Secrets are resolved here, so environment-variable references are read once, when
    /// the adapter is constructed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if a required credential is missing or cannot be
    /// resolved.
    pub fn headers(&self, platform: Platform, config: &PlatformConfig) -> Result<Vec<(String, String)>> {
        let headers = match *self {
            Self::Bearer => {
                let token = required(platform, "access_token", config.access_token.as_ref())?;
                vec![("Authorization".to_owned(), format!("Bearer {token}"))]
            }
            Self::TokenHeader(name) => {
                let token = required(platform, "access_token", config.access_token.as_ref())?;
                vec![(name.to_owned(), token)]
            }
            Self::PrefixedToken(prefix) => {
                let token = required(platform, "access_token", config.access_token.as_ref())?;
                vec![("Authorization".to_owned(), format!("{prefix} {token}"))]
            }
            Self::HeaderPair { key_header, token_header } => {
                let key = required(platform, "api_key", config.api_key.as_ref())?;
                let token = required(platform, "access_token", config.access_token.as_ref())?;
                vec![(key_header.to_owned(), key), (token_header.to_owned(), token)]
            }
            Self::Basic => {
                let username = required(platform, "username", config.username.as_ref())?;
                let password = required(platform, "password", config.password.as_ref())?;
                vec![basic_auth(&username, &password)]
            }
            Self::BasicApiKey => {
                let key = required(platform, "api_key", config.api_key.as_ref())?;
                vec![basic_auth(&key, "")]
            }
        };
        Ok(headers)
    }
}

fn required(platform: Platform, field: &str, secret: Option<&Secret>) -> Result<String> {
    let value = secret
        .ok_or_else(|| GatewayError::Config(format!("{} requires {field}", platform.id())))?
        .resolve()?;
    if value.is_empty() {
        return Err(GatewayError::Config(format!("{} requires a non-empty {field}", platform.id())));
    }
    Ok(value)
}

fn basic_auth(username: &str, password: &str) -> (String, String) {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    ("Authorization".to_owned(), format!("Basic {encoded}"))
}

/// Product listing endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ListEndpoint {
    /// HTTP method (some platforms list through a POST query endpoint).
    pub method: HttpMethod,
    /// Path relative to the base URL, including any fixed query string.
    pub path: &'static str,
    /// Request body builder for query-style listing endpoints.
    pub body: Option<fn() -> Value>,
    /// JSON pointer to the record array in the response (`""` for a bare array).
    pub items: &'static str,
}

/// Order creation endpoint.
#[derive(Debug, Clone, Copy)]
pub struct OrderEndpoint {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the base URL.
    pub path: &'static str,
    /// Key the order payload is wrapped under, if the platform expects an envelope.
    pub wrap: Option<&'static str>,
    /// Key the created order is returned under, if the platform answers with an envelope.
    pub unwrap: Option<&'static str>,
}

/// Inventory update endpoint.
#[derive(Debug, Clone, Copy)]
pub struct InventoryEndpoint {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template relative to the base URL; `{id}` is replaced by the product id.
    pub path: &'static str,
    /// Builds the platform-specific payload for a validated quantity.
    pub body: fn(u64) -> Value,
}

/// A normalized product field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    /// Product identifier.
    Id,
    /// Product title.
    Title,
    /// Product description.
    Description,
    /// Unit price.
    Price,
    /// Units in stock.
    Stock,
}

impl ProductField {
    /// Every product field.
    pub const ALL: [Self; 5] = [Self::Id, Self::Title, Self::Description, Self::Price, Self::Stock];

    /// Returns the field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::Price => "price",
            Self::Stock => "stock",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one product field can be read from inside a platform record.
#[derive(Debug, Clone, Copy)]
pub enum FieldSource {
    /// JSON pointer into the record (RFC 6901).
    Pointer(&'static str),
    /// Value of an entry in a list of attribute objects, selected by key.
    ///
    /// Magento stores descriptions as
    /// `custom_attributes: [{"attribute_code": "description", "value": "..."}]`.
    Attribute {
        /// JSON pointer to the attribute array.
        list: &'static str,
        /// Member holding the attribute name.
        key: &'static str,
        /// Attribute name to select.
        equals: &'static str,
        /// Member holding the attribute value.
        value: &'static str,
    },
}

impl FieldSource {
    /// Reads this source from a record.
    ///
    /// Returns `None` when the value is absent, `null` or an empty string.
    #[must_use]
    pub fn read<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let value = match *self {
            Self::Pointer(pointer) => record.pointer(pointer),
            Self::Attribute { list, key, equals, value } => record
                .pointer(list)?
                .as_array()?
                .iter()
                .find(|entry| entry.get(key).and_then(Value::as_str) == Some(equals))?
                .get(value),
        }?;
        is_present(value).then_some(value)
    }
}

/// Returns false for `null` and empty strings.
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Candidate sources for each product field, tried in order.
#[derive(Debug, Clone, Copy)]
pub struct ProductFields {
    /// Identifier sources.
    pub id: &'static [FieldSource],
    /// Title sources.
    pub title: &'static [FieldSource],
    /// Description sources.
    pub description: &'static [FieldSource],
    /// Price sources.
    pub price: &'static [FieldSource],
    /// Stock sources.
    pub stock: &'static [FieldSource],
}

impl ProductFields {
    /// Returns the candidate sources for a field.
    #[must_use]
    pub const fn sources(&self, field: ProductField) -> &'static [FieldSource] {
        match field {
            ProductField::Id => self.id,
            ProductField::Title => self.title,
            ProductField::Description => self.description,
            ProductField::Price => self.price,
            ProductField::Stock => self.stock,
        }
    }
}
