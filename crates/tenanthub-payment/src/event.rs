//! Webhook event envelope and typed payloads.

use serde::{Deserialize, Serialize};

use tenanthub_core::error::AppError;

/// Event type emitted when a hosted checkout completes.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Event type emitted when a subscription is cancelled at the processor.
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

/// The envelope every webhook delivery arrives in.
///
/// `data.object` stays untyped until the event type is known; callers
/// use [`WebhookEvent::checkout_session`] or
/// [`WebhookEvent::subscription`] to extract a typed payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Processor-assigned event id.
    pub id: String,
    /// Event type discriminator.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload.
    pub data: EventData,
}

/// Payload container inside the event envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    /// The object the event describes, shaped per event type.
    pub object: serde_json::Value,
}

/// Checkout session payload for `checkout.session.completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionPayload {
    /// Session id at the processor.
    pub id: String,
    /// Correlation id set at session creation; carries the access
    /// request id.
    pub client_reference_id: Option<String>,
    /// Customer id at the processor.
    pub customer: Option<String>,
    /// Subscription id at the processor.
    pub subscription: Option<String>,
    /// Email the customer checked out with.
    pub customer_email: Option<String>,
    /// Free-form metadata set at session creation.
    #[serde(default)]
    pub metadata: SessionMetadata,
}

/// Metadata attached to a checkout session at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Plan name the prospect checked out for.
    pub plan: Option<String>,
}

/// Subscription payload for `customer.subscription.deleted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPayload {
    /// Subscription id at the processor.
    pub id: String,
    /// Customer id at the processor.
    pub customer: String,
}

impl WebhookEvent {
    /// Parse an event envelope from a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(body).map_err(|e| {
            AppError::validation(format!("Malformed webhook event payload: {e}"))
        })
    }

    /// Extract the checkout session payload.
    pub fn checkout_session(&self) -> Result<CheckoutSessionPayload, AppError> {
        serde_json::from_value(self.data.object.clone()).map_err(|e| {
            AppError::validation(format!("Malformed checkout session payload: {e}"))
        })
    }

    /// Extract the subscription payload.
    pub fn subscription(&self) -> Result<SubscriptionPayload, AppError> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| AppError::validation(format!("Malformed subscription payload: {e}")))
    }
}
