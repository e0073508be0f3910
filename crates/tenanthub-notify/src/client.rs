//! Email delivery client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use tenanthub_core::config::EmailConfig;
use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;

/// Abstraction over the transactional email provider.
///
/// Delivery is always best-effort from the caller's perspective: state
/// transitions never roll back because an email failed, so callers log
/// send errors instead of propagating them.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one HTML email.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()>;
}

/// HTTP implementation of [`Notifier`].
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    config: EmailConfig,
}

impl HttpNotifier {
    /// Build a notifier from configuration.
    pub fn new(config: EmailConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build email HTTP client",
                    e,
                )
            })?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()> {
        let url = format!("{}/emails", self.config.api_base);
        let payload = json!({
            "from": format!("{} <{}>", self.config.sender_name, self.config.sender),
            "to": [to],
            "subject": subject,
            "html": html_body,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Email provider request failed", e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Email provider returned {status}: {body}"
            )));
        }

        info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}
