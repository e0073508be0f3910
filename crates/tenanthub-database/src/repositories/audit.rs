//! Audit record repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;
use tenanthub_core::types::pagination::{PageRequest, PageResponse};
use tenanthub_entity::audit::model::CreateAuditRecord;
use tenanthub_entity::audit::AuditRecord;

/// Repository for the append-only audit log.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    /// Create a new audit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an audit record by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditRecord>> {
        sqlx::query_as::<_, AuditRecord>("SELECT * FROM audit_log WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find audit record", e)
            })
    }

    /// Search the audit log with optional filters.
    pub async fn search(
        &self,
        actor_id: Option<Uuid>,
        action: Option<&str>,
        entity_type: Option<&str>,
        entity_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditRecord>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if actor_id.is_some() {
            conditions.push(format!("actor_id = ${param_idx}"));
            param_idx += 1;
        }
        if action.is_some() {
            conditions.push(format!("action = ${param_idx}"));
            param_idx += 1;
        }
        if entity_type.is_some() {
            conditions.push(format!("entity_type = ${param_idx}"));
            param_idx += 1;
        }
        if entity_id.is_some() {
            conditions.push(format!("entity_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM audit_log {where_clause}");
        let select_sql = format!(
            "SELECT * FROM audit_log {where_clause} ORDER BY created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditRecord>(&select_sql);

        if let Some(aid) = actor_id {
            count_query = count_query.bind(aid);
            select_query = select_query.bind(aid);
        }
        if let Some(a) = action {
            count_query = count_query.bind(a.to_string());
            select_query = select_query.bind(a.to_string());
        }
        if let Some(et) = entity_type {
            count_query = count_query.bind(et.to_string());
            select_query = select_query.bind(et.to_string());
        }
        if let Some(eid) = entity_id {
            count_query = count_query.bind(eid);
            select_query = select_query.bind(eid);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count audit records", e)
        })?;

        let records = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search audit log", e)
            })?;

        Ok(PageResponse::new(
            records,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Append an audit record.
    pub async fn create(&self, data: &CreateAuditRecord) -> AppResult<AuditRecord> {
        sqlx::query_as::<_, AuditRecord>(Self::INSERT_SQL)
            .bind(data.actor_id)
            .bind(&data.actor_label)
            .bind(&data.action)
            .bind(&data.entity_type)
            .bind(data.entity_id)
            .bind(&data.changes)
            .bind(&data.ip_address)
            .bind(&data.user_agent)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create audit record", e)
            })
    }

    /// Append an audit record inside an open transaction, so the record
    /// commits or rolls back together with the mutation it documents.
    pub async fn create_tx(
        &self,
        conn: &mut PgConnection,
        data: &CreateAuditRecord,
    ) -> AppResult<AuditRecord> {
        sqlx::query_as::<_, AuditRecord>(Self::INSERT_SQL)
            .bind(data.actor_id)
            .bind(&data.actor_label)
            .bind(&data.action)
            .bind(&data.entity_type)
            .bind(data.entity_id)
            .bind(&data.changes)
            .bind(&data.ip_address)
            .bind(&data.user_agent)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create audit record", e)
            })
    }

    const INSERT_SQL: &'static str =
        "INSERT INTO audit_log \
             (actor_id, actor_label, action, entity_type, entity_id, changes, ip_address, user_agent) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *";
}
