//! Payment processor configuration.

use serde::{Deserialize, Serialize};

/// Payment processor (hosted checkout + webhooks) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// API base URL of the payment processor.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Secret API key used for outbound calls.
    pub secret_key: String,
    /// Shared secret used to verify inbound webhook signatures.
    pub webhook_secret: String,
    /// URL the processor redirects to after successful payment.
    #[serde(default = "default_success_url")]
    pub success_url: String,
    /// URL the processor redirects to after cancelled payment.
    #[serde(default = "default_cancel_url")]
    pub cancel_url: String,
    /// Outbound request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// Maximum accepted age of a webhook signature timestamp, in seconds.
    #[serde(default = "default_signature_tolerance")]
    pub signature_tolerance_seconds: i64,
}

fn default_api_base() -> String {
    "https://api.payment.example.com".to_string()
}

fn default_success_url() -> String {
    "https://admin.tenanthub.example.com/access-requests/payment-success".to_string()
}

fn default_cancel_url() -> String {
    "https://admin.tenanthub.example.com/access-requests/payment-cancelled".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_signature_tolerance() -> i64 {
    300
}
