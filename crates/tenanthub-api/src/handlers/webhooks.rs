//! Payment webhook handler.
//!
//! The signature is verified over the raw body before anything is
//! parsed; handlers deliberately reply with a bare 400 on any
//! authenticity failure without saying which check failed.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;

use tenanthub_core::error::AppError;
use tenanthub_payment::WebhookEvent;

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/webhooks/payment
pub async fn payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let signature = headers
        .get("x-webhook-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authentication("Missing webhook signature"))
        .map_err(crate::error::ApiError::from)?;

    state
        .signature_verifier
        .verify(signature, &body, Utc::now().timestamp())?;

    let event = WebhookEvent::parse(&body)?;
    state.provisioning_service.handle_event(&event).await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new("processed"))))
}
