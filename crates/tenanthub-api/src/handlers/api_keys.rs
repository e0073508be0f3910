//! API key handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use tenanthub_entity::api_key::ApiKey;
use tenanthub_service::api_key::IssuedKey;

use crate::dto::request::{CreateApiKeyBody, ToggleApiKeyBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AdminContext;
use crate::state::AppState;

/// Query for listing keys.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    /// Restrict to one tenant's keys.
    pub tenant_id: Option<Uuid>,
}

/// GET /api/admin/api-keys?tenant_id=...
pub async fn list(
    State(state): State<AppState>,
    AdminContext(_ctx): AdminContext,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ApiKey>>>> {
    let keys = state.api_key_service.list(query.tenant_id).await?;
    Ok(Json(ApiResponse::ok(keys)))
}

/// POST /api/admin/api-keys
pub async fn create(
    State(state): State<AppState>,
    AdminContext(ctx): AdminContext,
    Json(body): Json<CreateApiKeyBody>,
) -> ApiResult<Json<ApiResponse<IssuedKey>>> {
    let issued = state
        .api_key_service
        .create(&ctx, body.tenant_id, body.environment, body.name)
        .await?;
    Ok(Json(ApiResponse::ok(issued)))
}

/// PATCH /api/admin/api-keys/{id}
pub async fn toggle(
    State(state): State<AppState>,
    AdminContext(ctx): AdminContext,
    Path(id): Path<Uuid>,
    Json(body): Json<ToggleApiKeyBody>,
) -> ApiResult<Json<ApiResponse<ApiKey>>> {
    let key = state.api_key_service.set_active(&ctx, id, body.is_active).await?;
    Ok(Json(ApiResponse::ok(key)))
}
