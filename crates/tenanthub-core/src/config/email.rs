//! Outbound email configuration.

use serde::{Deserialize, Serialize};

/// Transactional email API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// API base URL of the email provider.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// API key for the email provider.
    pub api_key: String,
    /// Sender address for all outbound mail.
    #[serde(default = "default_sender")]
    pub sender: String,
    /// Sender display name.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    /// Dashboard URL included in credential emails.
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
    /// Outbound request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://api.mail.example.com".to_string()
}

fn default_sender() -> String {
    "no-reply@tenanthub.example.com".to_string()
}

fn default_sender_name() -> String {
    "TenantHub".to_string()
}

fn default_dashboard_url() -> String {
    "https://dashboard.tenanthub.example.com".to_string()
}

fn default_timeout() -> u64 {
    10
}
