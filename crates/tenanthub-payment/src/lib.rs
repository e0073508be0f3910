//! # tenanthub-payment
//!
//! Payment processor integration: hosted checkout session creation and
//! verification of signed webhook deliveries.

pub mod client;
pub mod event;
pub mod signature;

pub use client::{CheckoutRequest, CheckoutSession, HttpPaymentGateway, PaymentGateway};
pub use event::{CheckoutSessionPayload, SubscriptionPayload, WebhookEvent};
pub use signature::SignatureVerifier;
