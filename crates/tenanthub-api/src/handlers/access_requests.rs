//! Access request handlers: public submission plus admin review.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use uuid::Uuid;

use tenanthub_entity::access_request::{AccessRequest, RequestStatus, UseCase};
use tenanthub_service::access_request::{ApproveOutcome, RequestStatsView, SubmitRequest};

use crate::dto::request::{ApproveBody, RejectBody};
use crate::dto::response::{ApiResponse, CountResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{AdminContext, PaginationParams};
use crate::state::AppState;

/// Query filters for the admin listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    /// Status filter.
    pub status: Option<RequestStatus>,
    /// Use case filter.
    pub use_case: Option<UseCase>,
    /// Substring search over email, name, company.
    pub search: Option<String>,
}

/// Count query.
#[derive(Debug, Clone, Deserialize)]
pub struct CountQuery {
    /// Status filter.
    pub status: Option<RequestStatus>,
}

/// POST /api/access-requests (public)
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitRequest>,
) -> ApiResult<Json<ApiResponse<AccessRequest>>> {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let request = state
        .access_request_service
        .submit(body, ip_address, user_agent)
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// GET /api/admin/access-requests
pub async fn list(
    State(state): State<AppState>,
    AdminContext(_ctx): AdminContext,
    Query(query): Query<ListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<AccessRequest>>>> {
    let page = pagination.into_page_request();
    let result = state
        .access_request_service
        .list(query.status, query.use_case, query.search.as_deref(), &page)
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/admin/access-requests/count
pub async fn count(
    State(state): State<AppState>,
    AdminContext(_ctx): AdminContext,
    Query(query): Query<CountQuery>,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.access_request_service.count(query.status).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/admin/access-requests/stats
pub async fn stats(
    State(state): State<AppState>,
    AdminContext(_ctx): AdminContext,
) -> ApiResult<Json<ApiResponse<RequestStatsView>>> {
    let stats = state.access_request_service.stats().await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/admin/access-requests/{id}
pub async fn get(
    State(state): State<AppState>,
    AdminContext(_ctx): AdminContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<AccessRequest>>> {
    let request = state.access_request_service.get(id).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/admin/access-requests/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    AdminContext(ctx): AdminContext,
    Path(id): Path<Uuid>,
    Json(body): Json<ApproveBody>,
) -> ApiResult<Json<ApiResponse<ApproveOutcome>>> {
    let outcome = state
        .access_request_service
        .approve(&ctx, id, body.plan, body.notes)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/admin/access-requests/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    AdminContext(ctx): AdminContext,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectBody>,
) -> ApiResult<Json<ApiResponse<AccessRequest>>> {
    let request = state
        .access_request_service
        .reject(&ctx, id, body.reason, body.notes, body.send_email)
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}
