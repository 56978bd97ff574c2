//! Commerce Gateway: one interface over many e-commerce platforms
//!
//! A Rust library that puts a single, capability-aware API in front of the REST APIs of
//! seventeen e-commerce and ERP platforms (Shopify, `BigCommerce`, `WooCommerce`, Magento,
//! `NetSuite`, Salesforce Commerce Cloud and more).
//!
//! # What is Commerce Gateway?
//!
//! Every platform names, nests and types its catalog differently, authenticates
//! differently and supports a different subset of write operations. The gateway hides
//! that behind three operations:
//!
//! - **Fetch products**: list the catalog as [`NormalizedProduct`]s with a decimal price
//!   and an integer stock level
//! - **Create order**: forward an order payload in the platform's native shape
//! - **Update inventory**: set a product's stock level
//!
//! An operation the platform's public API cannot perform fails with
//! [`GatewayError::Unsupported`] before any network traffic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │     Caller      │  service, CLI, batch job
//! └────────┬────────┘
//!          │ gateway.platform("shopify", &config)?.fetch_products()
//!          │
//! ┌────────▼────────────────────────────────────────┐
//! │          Commerce Gateway (this crate)          │
//! │  ┌──────────────┐      ┌──────────────────┐     │
//! │  │   Registry   │──────│ PlatformAdapter  │     │
//! │  │  (17 static  │      │ (profile + field │     │
//! │  │   profiles)  │      │  mapping)        │     │
//! │  └──────────────┘      └────────┬─────────┘     │
//! │                        ┌────────▼─────────┐     │
//! │                        │  PlatformClient  │     │
//! │                        │  (auth headers)  │     │
//! │                        └────────┬─────────┘     │
//! └─────────────────────────────────┼───────────────┘
//!                                   │ HTTPS (reqwest)
//! ┌─────────────────────────────────▼───────────────┐
//! │   Shopify · BigCommerce · WooCommerce · ...     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Fetch a Catalog
//!
//! ```rust,no_run
//! use commerce_gateway::{Gateway, platform::PlatformConfig};
//!
//! # async fn example() -> commerce_gateway::Result<()> {
//! let gateway = Gateway::new()?;
//! let config = PlatformConfig::new("bigcommerce")
//!     .with_store("abc123")
//!     .with_access_token("token");
//!
//! for product in gateway.platform("bigcommerce", &config)?.fetch_products().await? {
//!     println!("{}: {} @ {} ({} in stock)", product.id, product.title, product.price, product.stock);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Work From a Configuration File
//!
//! ```rust,no_run
//! use commerce_gateway::{Gateway, GatewayConfig};
//!
//! # async fn example() -> commerce_gateway::Result<()> {
//! let gateway = Gateway::from_config(GatewayConfig::from_file("gateway.toml")?)?;
//!
//! let warehouse = gateway.configured("warehouse")?;
//! warehouse.update_inventory("12", 40).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## 3. Check Capabilities First
//!
//! ```rust
//! use commerce_gateway::platform::{Capability, Platform};
//!
//! let platform = Platform::lookup("Squarespace").unwrap();
//! assert!(platform.capabilities().supports(Capability::FetchProducts));
//! assert!(!platform.capabilities().supports(Capability::CreateOrder));
//! ```
//!
//! # Module Organization
//!
//! - [`gateway`]: Facade and configuration file
//! - [`registry`]: Name to adapter resolution
//! - [`adapter`]: The [`Adapter`] trait and the profile-driven implementation
//! - [`platform`]: Platform table, capabilities and per-platform configuration
//! - [`normalize`]: Product normalization
//! - [`client`]: Authenticated JSON requests against one platform
//! - [`transport`]: HTTP transport abstraction
//! - [`audit`]: Audit trail for mutating operations
//! - [`error`]: Error types with recovery guidance
//!
//! # Security Considerations
//!
//! - **HTTPS only**: base URLs must use HTTPS and must not point at loopback hosts
//! - **Secrets from the environment**: credentials can be written as `{ env = "VAR" }` and
//!   are never printed by `Debug`
//! - **Path safety**: endpoint overrides and product ids are checked for traversal
//!   sequences before they reach a URL
//! - **Audit redaction**: card numbers and credentials are scrubbed from audited errors
//!
//! # Error Handling
//!
//! All operations return [`Result<T, GatewayError>`](error::Result):
//!
//! ```rust
//! use commerce_gateway::GatewayError;
//!
//! fn describe(error: &GatewayError) -> &'static str {
//!     match error {
//!         GatewayError::Unsupported { .. } => "route the operation elsewhere",
//!         GatewayError::UnknownPlatform(_) => "check the platform name",
//!         GatewayError::InvalidQuantity(_) | GatewayError::InvalidInput(_) => "fix the input",
//!         GatewayError::Config(_) => "fix the configuration",
//!         e if e.is_transport() => "retry if the operation is idempotent",
//!         _ => "unexpected",
//!     }
//! }
//!
//! assert_eq!(describe(&GatewayError::InvalidQuantity(-1)), "fix the input");
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

pub mod adapter;
pub mod audit;
pub mod client;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod platform;
pub mod registry;
pub mod transport;

pub use adapter::{Adapter, OrderRequest, OrderResult};
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayConfig, PlatformHandle};
pub use normalize::NormalizedProduct;
pub use platform::{Capabilities, Capability, Platform, PlatformConfig};
pub use registry::Registry;
