//! Per-platform connection configuration.
//!
//! [`PlatformConfig`] is deserializable from TOML and accepts the field spellings commonly
//! found in platform credential exports (`shop`, `store_hash`, `consumer_key`, ...), so a
//! configuration can usually be pasted in unchanged.

use std::fmt;

use serde::Deserialize;
use url::Url;

use crate::{
    error::{GatewayError, Result},
    platform::ProductField,
};

/// Connection data for one platform.
///
/// # Examples
///
/// ```
/// use commerce_gateway::platform::PlatformConfig;
///
/// let toml = r#"
///     platform = "shopify"
///     shop = "test.myshopify.com"
///     access_token = "tok"
/// "#;
///
/// let config = PlatformConfig::from_toml(toml).unwrap();
/// assert_eq!(config.store.as_deref(), Some("test.myshopify.com"));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformConfig {
    /// Platform identifier; when set, must name the platform the config is resolved for.
    #[serde(default)]
    pub platform: Option<String>,

    /// API base URL for self-hosted platforms.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Store identifier for hosted platforms with templated base URLs.
    #[serde(
        default,
        alias = "shop",
        alias = "store_hash",
        alias = "account_id",
        alias = "portal_id",
        alias = "storeIdentifier"
    )]
    pub store: Option<String>,

    /// OAuth access token, private token or session id.
    #[serde(default, alias = "accessToken", alias = "private_token", alias = "session_id")]
    pub access_token: Option<Secret>,

    /// API key or merchant id.
    #[serde(default, alias = "apiKey", alias = "merchant_id")]
    pub api_key: Option<Secret>,

    /// Basic-auth user name.
    #[serde(default, alias = "key", alias = "consumer_key")]
    pub username: Option<Secret>,

    /// Basic-auth password.
    #[serde(default, alias = "secret", alias = "consumer_secret")]
    pub password: Option<Secret>,

    /// Capability overrides; these can only switch capabilities off.
    #[serde(default)]
    pub capabilities: CapabilityOverrides,

    /// Endpoint path overrides.
    #[serde(default)]
    pub endpoints: EndpointOverrides,

    /// Product field pointer overrides.
    #[serde(default)]
    pub field_mappings: FieldOverrides,
}

impl PlatformConfig {
    /// Creates an empty configuration tagged with a platform identifier.
    #[must_use]
    pub fn new(platform: impl Into<String>) -> Self {
        Self { platform: Some(platform.into()), ..Self::default() }
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the store identifier.
    #[must_use]
    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<Secret>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<Secret>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets basic-auth credentials.
    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<Secret>, password: impl Into<Secret>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets capability overrides.
    #[must_use]
    pub const fn with_capabilities(mut self, overrides: CapabilityOverrides) -> Self {
        self.capabilities = overrides;
        self
    }

    /// Parses and validates a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the TOML is malformed or fails validation.
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| GatewayError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for security issues.
    ///
    /// This method checks for:
    /// - Base URL must be HTTPS and must not be a loopback address
    /// - Store identifier must be a plain host or account token with no dot segments
    /// - Endpoint overrides must not contain path traversal sequences
    /// - Field mapping pointers must be well-formed JSON pointers
    /// - Environment variable names in secrets must be alphanumeric
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if any validation fails.
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = self.base_url.as_deref().filter(|s| !s.is_empty()) {
            validate_base_url(base_url)?;
        }

        if let Some(store) = self.store.as_deref() {
            validate_store(store)?;
        }

        for secret in [&self.access_token, &self.api_key, &self.username, &self.password]
            .into_iter()
            .flatten()
        {
            if let Secret::Env { env } = secret {
                validate_env_var_name(env)?;
            }
        }

        self.endpoints.validate()?;
        self.field_mappings.validate()?;

        Ok(())
    }
}

/// A credential value.
///
/// Either a literal string or a reference to an environment variable, written in TOML as
/// `access_token = "..."` or `access_token = { env = "SHOPIFY_TOKEN" }`. Never printed by
/// [`Debug`](fmt::Debug).
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Secret {
    /// Literal value.
    Literal(String),
    /// Value read from an environment variable.
    Env {
        /// Environment variable name.
        env: String,
    },
}

impl Secret {
    /// Creates a secret that reads the named environment variable.
    #[must_use]
    pub fn env(name: impl Into<String>) -> Self {
        Self::Env { env: name.into() }
    }

    /// Returns the secret value.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the referenced environment variable is unset or
    /// not valid Unicode.
    pub fn resolve(&self) -> Result<String> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Env { env } => std::env::var(env).map_err(|e| {
                GatewayError::Config(format!("cannot read secret from environment variable {env}: {e}"))
            }),
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(_) => f.write_str("Secret([REDACTED])"),
            Self::Env { env } => f.debug_struct("Secret").field("env", env).finish(),
        }
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_owned())
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

/// Capability overrides. `Some(false)` switches a capability off; `Some(true)` and `None`
/// keep the platform's declared value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CapabilityOverrides {
    /// Override for product listing.
    #[serde(default)]
    pub fetch_products: Option<bool>,
    /// Override for order creation.
    #[serde(default)]
    pub create_order: Option<bool>,
    /// Override for inventory updates.
    #[serde(default)]
    pub update_inventory: Option<bool>,
}

/// Endpoint path overrides, relative to the platform base URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointOverrides {
    /// Product listing path.
    pub products: Option<String>,
    /// Order creation path.
    pub orders: Option<String>,
    /// Inventory update path template; `{id}` is replaced by the product id.
    pub inventory: Option<String>,
}

impl EndpointOverrides {
    /// Validates endpoint templates for security issues.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if any endpoint is invalid.
    pub fn validate(&self) -> Result<()> {
        let endpoints =
            [("products", &self.products), ("orders", &self.orders), ("inventory", &self.inventory)];

        for (name, endpoint) in endpoints {
            if let Some(path) = endpoint {
                validate_endpoint_path(name, path)?;
            }
        }

        if let Some(inventory) = &self.inventory
            && !inventory.contains("{id}")
        {
            return Err(GatewayError::Config(format!(
                "endpoint 'inventory' must contain an {{id}} placeholder: {inventory}"
            )));
        }

        Ok(())
    }
}

/// Validates an endpoint path template.
pub(crate) fn validate_endpoint_path(name: &str, path: &str) -> Result<()> {
    if path.contains("..") {
        return Err(GatewayError::Config(format!(
            "endpoint '{name}' contains path traversal sequence '..': {path}"
        )));
    }

    // Double slashes enable path confusion
    if path.contains("//") {
        return Err(GatewayError::Config(format!(
            "endpoint '{name}' contains double slash '//': {path}"
        )));
    }

    if !path.starts_with('/') {
        return Err(GatewayError::Config(format!("endpoint '{name}' must start with '/': {path}")));
    }

    Ok(())
}

/// Product field overrides as JSON pointers into each platform record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldOverrides {
    /// Identifier pointer.
    pub id: Option<String>,
    /// Title pointer.
    pub title: Option<String>,
    /// Description pointer.
    pub description: Option<String>,
    /// Price pointer.
    pub price: Option<String>,
    /// Stock pointer.
    pub stock: Option<String>,
}

impl FieldOverrides {
    /// Returns the override pointer for a field, if any.
    #[must_use]
    pub fn get(&self, field: ProductField) -> Option<&str> {
        match field {
            ProductField::Id => self.id.as_deref(),
            ProductField::Title => self.title.as_deref(),
            ProductField::Description => self.description.as_deref(),
            ProductField::Price => self.price.as_deref(),
            ProductField::Stock => self.stock.as_deref(),
        }
    }

    /// Validates the override pointers.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if a pointer does not start with `/` or contains a
    /// null byte.
    pub fn validate(&self) -> Result<()> {
        for field in ProductField::ALL {
            if let Some(pointer) = self.get(field) {
                validate_field_pointer(field.as_str(), pointer)?;
            }
        }
        Ok(())
    }
}

fn validate_field_pointer(context: &str, pointer: &str) -> Result<()> {
    if !pointer.starts_with('/') {
        return Err(GatewayError::Config(format!(
            "field mapping '{context}' must be a JSON pointer starting with '/': {pointer}"
        )));
    }

    if pointer.contains('\0') {
        return Err(GatewayError::Config(format!("field mapping '{context}' contains null byte")));
    }

    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url)
        .map_err(|e| GatewayError::Config(format!("invalid base_url '{base_url}': {e}")))?;

    if url.scheme() != "https" {
        return Err(GatewayError::Config(format!("base_url must use HTTPS, got: {}", url.scheme())));
    }

    if let Some(host) = url.host_str() {
        let host_lower = host.to_lowercase();
        if host_lower == "localhost"
            || host_lower == "::1"
            || host_lower == "[::1]"
            || host_lower.starts_with("127.")
        {
            return Err(GatewayError::Config(format!(
                "base_url must not be localhost or loopback: {host}"
            )));
        }
    }

    Ok(())
}

fn validate_store(store: &str) -> Result<()> {
    if store.is_empty() {
        return Err(GatewayError::Config("store identifier cannot be empty".to_owned()));
    }

    if let Some(ch) = store.chars().find(|ch| !ch.is_ascii_alphanumeric() && !"._-".contains(*ch)) {
        return Err(GatewayError::Config(format!(
            "store identifier contains invalid character '{ch}': {store}"
        )));
    }

    // Store templates place the value inside a path, where dot segments collapse.
    if store.starts_with('.') || store.ends_with('.') || store.contains("..") {
        return Err(GatewayError::Config(format!(
            "store identifier must not start or end with '.' or contain '..': {store}"
        )));
    }

    Ok(())
}

fn validate_env_var_name(name: &str) -> Result<()> {
    let Some(first_char) = name.chars().next() else {
        return Err(GatewayError::Config("environment variable name cannot be empty".to_owned()));
    };

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(GatewayError::Config(format!(
            "environment variable name must start with letter or underscore: {name}"
        )));
    }

    if let Some(ch) = name.chars().find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(GatewayError::Config(format!(
            "environment variable name contains invalid character '{ch}': {name}"
        )));
    }

    Ok(())
}
