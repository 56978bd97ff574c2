//! Audit trail for mutating operations.
//!
//! Every order creation and inventory update that passes through the
//! [`Gateway`](crate::gateway::Gateway) produces an [`AuditEvent`]. Events are handed to an
//! [`AuditSink`] on a detached task: the caller never waits for the sink, and a sink
//! failure is logged and dropped rather than returned.
//!
//! The default [`TracingAuditSink`] writes events to the `audit` tracing target so they
//! can be routed to a separate log file or SIEM by the subscriber configuration.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::warn;
use uuid::Uuid;

use crate::{error::Result, platform::Platform};

const CARD_PLACEHOLDER: &str = "XXXX-XXXX-XXXX-XXXX";
const SECRET_PLACEHOLDER: &str = "[REDACTED]";

/// Markers after which the next token is treated as a credential. Matched
/// case-insensitively.
const CREDENTIAL_MARKERS: &[&str] =
    &["bearer ", "basic ", "zoho-oauthtoken ", "token=", "password=", "secret="];

/// Kinds of audited operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    /// Platform accepted an order.
    OrderCreated,
    /// Order creation failed or was refused.
    OrderFailed,
    /// Platform accepted a stock level.
    InventoryUpdated,
    /// Inventory update failed or was refused.
    InventoryUpdateFailed,
}

impl AuditEventType {
    /// Returns true for the failure variants.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::OrderFailed | Self::InventoryUpdateFailed)
    }
}

/// Contextual fields of an audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AuditDetails {
    /// Product whose stock was changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Stock level that was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// Identifier the platform assigned to a created order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Error message, with card numbers and credentials redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Duration of the platform call in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// A single audited operation.
///
/// # Examples
///
/// ```
/// use commerce_gateway::{
///     audit::{AuditEvent, AuditEventType},
///     platform::Platform,
/// };
///
/// let event = AuditEvent::new(AuditEventType::InventoryUpdated, Platform::BigCommerce)
///     .with_label("warehouse")
///     .with_product_id("77")
///     .with_quantity(12);
///
/// assert_eq!(event.details.quantity, Some(12));
/// commerce_gateway::audit::audit_log(&event);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the operation completed.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub event_type: AuditEventType,
    /// Platform the operation targeted.
    pub platform: Platform,
    /// Configured name of the platform account, if the call came through one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Correlation id for this event.
    pub request_id: Uuid,
    /// Contextual fields.
    pub details: AuditDetails,
}

impl AuditEvent {
    /// Creates an event stamped with the current time and a fresh request id.
    #[must_use]
    pub fn new(event_type: AuditEventType, platform: Platform) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            platform,
            label: None,
            request_id: Uuid::new_v4(),
            details: AuditDetails::default(),
        }
    }

    /// Sets the configured account name.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the product id.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.details.product_id = Some(product_id.into());
        self
    }

    /// Sets the requested quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: i64) -> Self {
        self.details.quantity = Some(quantity);
        self
    }

    /// Sets the platform's order id.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.details.order_id = Some(order_id.into());
        self
    }

    /// Sets the error message, redacting card numbers and credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use commerce_gateway::{
    ///     audit::{AuditEvent, AuditEventType},
    ///     platform::Platform,
    /// };
    ///
    /// let event = AuditEvent::new(AuditEventType::OrderFailed, Platform::Shopify)
    ///     .with_error("card 4111 1111 1111 1111 declined");
    ///
    /// assert_eq!(event.details.error.as_deref(), Some("card XXXX-XXXX-XXXX-XXXX declined"));
    /// ```
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.details.error = Some(redact_sensitive(&error.into()));
        self
    }

    /// Sets the call duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.details.duration_ms = Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

/// Writes an event to the `audit` tracing target.
pub fn audit_log(event: &AuditEvent) {
    tracing::info!(
        target: "audit",
        timestamp = %event.timestamp.to_rfc3339(),
        event_type = ?event.event_type,
        platform = %event.platform,
        label = event.label.as_deref().unwrap_or(""),
        request_id = %event.request_id,
        details = ?event.details,
        "AUDIT"
    );
}

/// Destination for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync + fmt::Debug {
    /// Stores one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be stored. The gateway logs the error and
    /// carries on.
    async fn record(&self, event: &AuditEvent) -> Result<()>;
}

/// Sink that writes events through [`audit_log`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<()> {
        audit_log(event);
        Ok(())
    }
}

/// Hands an event to a sink without waiting for it.
///
/// Inside a Tokio runtime the sink runs on a detached task and the handle is returned so
/// callers that care (tests, shutdown paths) can await it. Outside a runtime the event is
/// written to the `audit` target synchronously instead and `None` is returned.
pub fn dispatch(sink: &Arc<dyn AuditSink>, event: AuditEvent) -> Option<JoinHandle<()>> {
    let Ok(handle) = Handle::try_current() else {
        audit_log(&event);
        return None;
    };

    let sink = Arc::clone(sink);
    Some(handle.spawn(async move {
        if let Err(error) = sink.record(&event).await {
            warn!(
                request_id = %event.request_id,
                event_type = ?event.event_type,
                %error,
                "audit sink failed; event dropped"
            );
        }
    }))
}

/// Redacts card numbers and credentials from free text.
///
/// Card numbers are runs of 13 to 19 digits, optionally grouped with single spaces or
/// hyphens. Credentials are the token following `Bearer `, `Basic `, `token=` and similar
/// markers.
///
/// # Examples
///
/// ```
/// use commerce_gateway::audit::redact_sensitive;
///
/// assert_eq!(
///     redact_sensitive("Authorization: Bearer abc123 rejected"),
///     "Authorization: Bearer [REDACTED] rejected"
/// );
/// assert_eq!(redact_sensitive("card 4111-1111-1111-1111"), "card XXXX-XXXX-XXXX-XXXX");
/// assert_eq!(redact_sensitive("order 1001 failed"), "order 1001 failed");
/// ```
#[must_use]
pub fn redact_sensitive(input: &str) -> String {
    redact_card_numbers(&redact_credentials(input))
}

#[allow(
    clippy::string_slice,
    reason = "offsets come from ASCII marker matches on an ASCII-lowercased copy with identical byte layout"
)]
fn redact_credentials(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;

    loop {
        let next = CREDENTIAL_MARKERS
            .iter()
            .filter_map(|marker| lower[cursor..].find(marker).map(|pos| (cursor + pos, marker.len())))
            .min_by_key(|&(pos, _)| pos);

        let Some((start, len)) = next else {
            output.push_str(&input[cursor..]);
            return output;
        };

        let value_start = start + len;
        let value_end = input[value_start..]
            .find(|ch: char| ch.is_whitespace() || matches!(ch, '"' | '\'' | ',' | '&' | ';'))
            .map_or(input.len(), |pos| value_start + pos);

        output.push_str(&input[cursor..value_start]);
        if value_end > value_start {
            output.push_str(SECRET_PLACEHOLDER);
        }
        cursor = value_end;
    }
}

fn redact_card_numbers(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut output = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            output.push(chars[i]);
            i += 1;
            continue;
        }

        let mut digits = 0;
        let mut end = i;
        let mut j = i;
        while j < chars.len() {
            if chars[j].is_ascii_digit() {
                digits += 1;
                j += 1;
                end = j;
            } else if matches!(chars[j], ' ' | '-')
                && chars.get(j + 1).is_some_and(char::is_ascii_digit)
            {
                j += 1;
            } else {
                break;
            }
        }

        if (13..=19).contains(&digits) {
            output.push_str(CARD_PLACEHOLDER);
        } else {
            output.extend(&chars[i..end]);
        }
        i = end;
    }

    output
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::GatewayError;

    #[derive(Debug, Default)]
    struct RecordingSink {
        events: Mutex<Vec<AuditEvent>>,
    }

    #[async_trait]
    impl AuditSink for RecordingSink {
        async fn record(&self, event: &AuditEvent) -> Result<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn record(&self, _event: &AuditEvent) -> Result<()> {
            Err(GatewayError::Transport("audit store offline".to_owned()))
        }
    }

    #[test]
    fn test_redact_card_numbers() {
        let inputs = [
            ("Card: 4111-1111-1111-1111", "Card: XXXX-XXXX-XXXX-XXXX"),
            ("Card: 4111 1111 1111 1111", "Card: XXXX-XXXX-XXXX-XXXX"),
            ("Card: 4111111111111111.", "Card: XXXX-XXXX-XXXX-XXXX."),
            ("amex 3782 822463 10005 ok", "amex XXXX-XXXX-XXXX-XXXX ok"),
        ];

        for (input, expected) in inputs {
            assert_eq!(redact_sensitive(input), expected, "failed to redact: {input}");
        }
    }

    #[test]
    fn test_short_numbers_preserved() {
        let input = "status 422: quantity 12 for product 632910392 on 2026-10-18";
        assert_eq!(redact_sensitive(input), input);
    }

    #[test]
    fn test_redact_credentials() {
        assert_eq!(redact_sensitive("bearer tok_live_1"), "bearer [REDACTED]");
        assert_eq!(
            redact_sensitive("Authorization: Zoho-oauthtoken 1000.abc expired"),
            "Authorization: Zoho-oauthtoken [REDACTED] expired"
        );
        assert_eq!(
            redact_sensitive("GET /x?token=s3cr3t&page=2"),
            "GET /x?token=[REDACTED]&page=2"
        );
        assert_eq!(redact_sensitive("Basic "), "Basic ");
    }

    #[test]
    fn test_redact_multiple_patterns() {
        let result = redact_sensitive("Bearer abc card 4111111111111111 password=hunter2");
        assert_eq!(result, "Bearer [REDACTED] card XXXX-XXXX-XXXX-XXXX password=[REDACTED]");
    }

    #[test]
    fn test_redact_empty_and_unicode() {
        assert_eq!(redact_sensitive(""), "");
        assert_eq!(redact_sensitive("commande échouée ✓"), "commande échouée ✓");
    }

    #[test]
    fn test_event_builder() {
        let event = AuditEvent::new(AuditEventType::InventoryUpdated, Platform::WooCommerce)
            .with_label("warehouse")
            .with_product_id("12")
            .with_quantity(3)
            .with_duration(Duration::from_millis(250));

        assert_eq!(event.label.as_deref(), Some("warehouse"));
        assert_eq!(event.details.product_id.as_deref(), Some("12"));
        assert_eq!(event.details.quantity, Some(3));
        assert_eq!(event.details.duration_ms, Some(250));
        assert!(!event.event_type.is_failure());
    }

    #[test]
    fn test_event_serialization() {
        let event = AuditEvent::new(AuditEventType::OrderCreated, Platform::Shopify)
            .with_order_id("450789469");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"]["type"], "order_created");
        assert_eq!(json["platform"], "shopify");
        assert_eq!(json["details"]["order_id"], "450789469");
        assert!(json.get("label").is_none());
        assert!(json["details"].get("error").is_none());
    }

    #[test]
    fn test_dispatch_without_runtime_logs_synchronously() {
        let sink: Arc<dyn AuditSink> = Arc::new(RecordingSink::default());
        let event = AuditEvent::new(AuditEventType::OrderFailed, Platform::Wix);
        assert!(dispatch(&sink, event).is_none());
    }

    #[tokio::test]
    async fn test_dispatch_records_on_detached_task() {
        let recording = Arc::new(RecordingSink::default());
        let sink: Arc<dyn AuditSink> = Arc::clone(&recording) as Arc<dyn AuditSink>;
        let event = AuditEvent::new(AuditEventType::OrderCreated, Platform::BigCommerce);
        let request_id = event.request_id;

        dispatch(&sink, event).unwrap().await.unwrap();

        let events = recording.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].request_id, request_id);
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let sink: Arc<dyn AuditSink> = Arc::new(FailingSink);
        let event = AuditEvent::new(AuditEventType::InventoryUpdateFailed, Platform::Magento);

        // Task completes normally even though the sink errored.
        dispatch(&sink, event).unwrap().await.unwrap();
    }
}
