//! Platform adapters.
//!
//! An [`Adapter`] exposes the three uniform gateway operations for one platform account.
//! [`PlatformAdapter`] implements it for every platform by combining:
//!
//! - the platform's static profile (endpoints, auth scheme, field sources)
//! - an [`EndpointResolver`] for configured path overrides
//! - a [`FieldMapper`] for configured field overrides
//! - a [`PlatformClient`](crate::client::PlatformClient) for the HTTP round trip

pub mod endpoint;
pub mod field_map;
pub mod rest;
pub mod traits;

pub use endpoint::EndpointResolver;
pub use field_map::FieldMapper;
pub use rest::PlatformAdapter;
pub use traits::{Adapter, OrderRequest, OrderResult, validate_product_id, validate_quantity};
