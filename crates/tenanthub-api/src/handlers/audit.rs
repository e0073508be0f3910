//! Audit log viewer handler.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use uuid::Uuid;

use tenanthub_entity::audit::AuditRecord;

use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{AdminContext, PaginationParams};
use crate::state::AppState;

/// Query filters for the audit log.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Actor filter.
    pub actor_id: Option<Uuid>,
    /// Action tag filter.
    pub action: Option<String>,
    /// Entity type filter.
    pub entity_type: Option<String>,
    /// Entity id filter.
    pub entity_id: Option<Uuid>,
}

/// GET /api/admin/audit
pub async fn search(
    State(state): State<AppState>,
    AdminContext(_ctx): AdminContext,
    Query(query): Query<SearchQuery>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<AuditRecord>>>> {
    let page = pagination.into_page_request();
    let result = state
        .audit_service
        .search(
            query.actor_id,
            query.action.as_deref(),
            query.entity_type.as_deref(),
            query.entity_id,
            &page,
        )
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}
