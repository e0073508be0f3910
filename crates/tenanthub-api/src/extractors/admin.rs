//! Admin identity extractor.
//!
//! Session handling lives in the upstream auth layer; it forwards the
//! authenticated admin's identity in trusted headers. This extractor
//! turns those headers plus request provenance into a service
//! [`RequestContext`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use tenanthub_core::error::AppError;
use tenanthub_service::RequestContext;

use crate::error::ApiError;

/// The acting admin, extracted from `x-admin-id` / `x-admin-email`.
#[derive(Debug, Clone)]
pub struct AdminContext(pub RequestContext);

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin_id = parts
            .headers
            .get("x-admin-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(|| {
                ApiError(AppError::validation("Missing or invalid x-admin-id header"))
            })?;

        let admin_email = parts
            .headers
            .get("x-admin-email")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ApiError(AppError::validation("Missing x-admin-email header")))?;

        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string());

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self(RequestContext::new(
            admin_id,
            admin_email,
            ip_address,
            user_agent,
        )))
    }
}
