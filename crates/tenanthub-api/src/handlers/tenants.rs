//! Tenant administration handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use tenanthub_entity::tenant::{Tenant, TenantStatus};
use tenanthub_service::tenant::ResendOutcome;

use crate::dto::request::UpdateTenantBody;
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{AdminContext, PaginationParams};
use crate::state::AppState;

/// Query filters for the tenant listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    /// Status filter.
    pub status: Option<TenantStatus>,
    /// Substring search over email, name, company.
    pub search: Option<String>,
}

/// GET /api/admin/tenants
pub async fn list(
    State(state): State<AppState>,
    AdminContext(_ctx): AdminContext,
    Query(query): Query<ListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<Tenant>>>> {
    let page = pagination.into_page_request();
    let result = state
        .tenant_service
        .list(query.status, query.search.as_deref(), &page)
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/admin/tenants/{id}
pub async fn get(
    State(state): State<AppState>,
    AdminContext(_ctx): AdminContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Tenant>>> {
    let tenant = state.tenant_service.get(id).await?;
    Ok(Json(ApiResponse::ok(tenant)))
}

/// PATCH /api/admin/tenants/{id}
pub async fn update(
    State(state): State<AppState>,
    AdminContext(ctx): AdminContext,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTenantBody>,
) -> ApiResult<Json<ApiResponse<Tenant>>> {
    let tenant = state.tenant_service.update(&ctx, id, body.into()).await?;
    Ok(Json(ApiResponse::ok(tenant)))
}

/// POST /api/admin/tenants/{id}/resend-credentials
pub async fn resend_credentials(
    State(state): State<AppState>,
    AdminContext(ctx): AdminContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ResendOutcome>>> {
    let outcome = state.tenant_service.resend_credentials(&ctx, id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
