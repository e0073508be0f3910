//! Payment gateway client for hosted checkout sessions.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use tenanthub_core::config::PaymentConfig;
use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;

/// Parameters for creating a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Access request this session pays for; round-trips through the
    /// processor as `client_reference_id`.
    pub reference_id: Uuid,
    /// Prospect email to prefill at checkout.
    pub customer_email: String,
    /// Plan name to record in session metadata.
    pub plan: String,
}

/// A created checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session id at the processor.
    pub id: String,
    /// Hosted checkout URL to hand to the prospect.
    pub url: String,
}

/// Abstraction over the payment processor's API.
///
/// The production implementation talks HTTP; tests substitute a fake
/// that mints deterministic sessions.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session.
    async fn create_checkout_session(&self, request: &CheckoutRequest)
        -> AppResult<CheckoutSession>;
}

/// HTTP implementation of [`PaymentGateway`].
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl HttpPaymentGateway {
    /// Build a gateway from configuration.
    pub fn new(config: PaymentConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build payment HTTP client",
                    e,
                )
            })?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> AppResult<CheckoutSession> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base);
        let reference_id = request.reference_id.to_string();

        let params = [
            ("mode", "subscription"),
            ("client_reference_id", reference_id.as_str()),
            ("customer_email", request.customer_email.as_str()),
            ("metadata[plan]", request.plan.as_str()),
            ("success_url", self.config.success_url.as_str()),
            ("cancel_url", self.config.cancel_url.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Payment processor request failed",
                    e,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Payment processor returned {status}: {body}"
            )));
        }

        let session: CheckoutSession = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Malformed checkout session response",
                e,
            )
        })?;

        info!(
            session_id = %session.id,
            reference_id = %request.reference_id,
            "Created checkout session"
        );
        Ok(session)
    }
}
