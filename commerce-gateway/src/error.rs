//! Error types for the commerce gateway.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Transport errors** ([`GatewayError::Http`], [`GatewayError::Status`],
//!   [`GatewayError::InvalidResponse`], [`GatewayError::Transport`]): the HTTP round trip to
//!   the platform failed. These are surfaced unmodified and never retried by the gateway.
//! - **Capability errors** ([`GatewayError::Unsupported`]): the platform's public API
//!   cannot perform the requested operation. Returned before any network call.
//! - **Resolution errors** ([`GatewayError::UnknownPlatform`]): the registry has no adapter
//!   for the requested platform name.
//! - **Validation errors** ([`GatewayError::InvalidQuantity`], [`GatewayError::InvalidInput`],
//!   [`GatewayError::Config`]): the caller supplied bad input or configuration.
//!
//! # Examples
//!
//! ```
//! use commerce_gateway::error::{GatewayError, Result};
//!
//! fn checked_quantity(quantity: i64) -> Result<u64> {
//!     u64::try_from(quantity).map_err(|_| GatewayError::InvalidQuantity(quantity))
//! }
//!
//! assert!(checked_quantity(-1).is_err());
//! ```

use thiserror::Error;

use crate::platform::{Capability, Platform};

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur in the commerce gateway.
///
/// # Error Recovery
///
/// - **Transport errors**: retry policy belongs to the caller, since retry safety depends on
///   whether the specific operation is idempotent on the specific platform
/// - **Capability errors**: expected outcome, route the operation elsewhere or skip it
/// - **Validation errors**: fix input or configuration and try again
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS and TLS failures.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Platform answered with a non-2xx status.
    #[error("{platform} returned status {status}: {body}")]
    Status {
        /// Platform that returned the status.
        platform: Platform,
        /// HTTP status code.
        status: u16,
        /// Truncated response body for diagnostics.
        body: String,
    },

    /// Platform answered with a body that is not valid JSON.
    #[error("invalid response from {platform}: {message}")]
    InvalidResponse {
        /// Platform that sent the response.
        platform: Platform,
        /// Parse failure description.
        message: String,
    },

    /// Request could not be built or was rejected before being sent.
    ///
    /// Covers URL validation, header validation and unsafe request paths.
    #[error("transport error: {0}")]
    Transport(String),

    /// Operation is not supported by the platform's public API.
    ///
    /// This is a declared outcome, not a failed call: no request is sent.
    ///
    /// # Examples
    ///
    /// ```
    /// use commerce_gateway::{
    ///     error::GatewayError,
    ///     platform::{Capability, Platform},
    /// };
    ///
    /// let err = GatewayError::Unsupported {
    ///     platform: Platform::Squarespace,
    ///     capability: Capability::CreateOrder,
    /// };
    /// assert_eq!(err.to_string(), "Squarespace does not support create_order");
    /// assert!(err.is_unsupported());
    /// ```
    #[error("{platform} does not support {capability}")]
    Unsupported {
        /// Platform that lacks the capability.
        platform: Platform,
        /// Capability that was requested.
        capability: Capability,
    },

    /// No adapter is registered under the given platform name.
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    /// Inventory quantity was negative.
    #[error("invalid inventory quantity {0}: must be a non-negative integer")]
    InvalidQuantity(i64),

    /// Caller-supplied input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Platform or gateway configuration is invalid.
    ///
    /// Returned for TOML parse errors, failed validation, missing credentials and
    /// unresolvable environment-variable secrets.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GatewayError {
    /// Returns true for failures of the HTTP round trip itself.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::InvalidResponse { .. } | Self::Transport(_)
        )
    }

    /// Returns true when the platform declared the operation unsupported.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Returns the HTTP status code when the platform answered with a non-2xx status.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
