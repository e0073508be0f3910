//! Access request repository implementation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;
use tenanthub_core::types::pagination::{PageRequest, PageResponse};
use tenanthub_entity::access_request::model::CreateAccessRequest;
use tenanthub_entity::access_request::{AccessRequest, RequestStatus, UseCase};

/// Aggregate counts over the access request table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RequestStats {
    /// Requests still awaiting a decision.
    pub pending: i64,
    /// Requests approved so far.
    pub approved: i64,
    /// Requests rejected so far.
    pub rejected: i64,
    /// All requests ever submitted.
    pub total: i64,
}

/// Repository for access request persistence and queries.
#[derive(Debug, Clone)]
pub struct AccessRequestRepository {
    pool: PgPool,
}

impl AccessRequestRepository {
    /// Create a new access request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a request by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>("SELECT * FROM access_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find access request", e)
            })
    }

    /// Find a request by primary key inside an open transaction.
    ///
    /// Takes a row lock so concurrent provisioning attempts for the same
    /// request serialize instead of racing.
    pub async fn find_by_id_tx(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>("SELECT * FROM access_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find access request", e)
            })
    }

    /// List requests with optional status/use-case filters and text
    /// search over email, name, and company, newest first.
    pub async fn find_all(
        &self,
        status: Option<RequestStatus>,
        use_case: Option<UseCase>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AccessRequest>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if use_case.is_some() {
            conditions.push(format!("use_case = ${param_idx}"));
            param_idx += 1;
        }
        if search.is_some() {
            conditions.push(format!(
                "(email ILIKE ${param_idx} OR full_name ILIKE ${param_idx} OR company ILIKE ${param_idx})"
            ));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM access_requests {where_clause}");
        let select_sql = format!(
            "SELECT * FROM access_requests {where_clause} ORDER BY created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AccessRequest>(&select_sql);

        if let Some(s) = status {
            count_query = count_query.bind(s);
            select_query = select_query.bind(s);
        }
        if let Some(uc) = use_case {
            count_query = count_query.bind(uc);
            select_query = select_query.bind(uc);
        }
        if let Some(q) = search {
            let pattern = format!("%{q}%");
            count_query = count_query.bind(pattern.clone());
            select_query = select_query.bind(pattern);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count access requests", e)
        })?;

        let requests = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list access requests", e)
            })?;

        Ok(PageResponse::new(
            requests,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count requests in a given status.
    pub async fn count_by_status(&self, status: RequestStatus) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM access_requests WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count access requests", e)
            })?;
        Ok(count as u64)
    }

    /// Count requests approved at or after the given time.
    pub async fn count_approved_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM access_requests WHERE status = 'approved' AND approved_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count approved requests", e)
        })?;
        Ok(count as u64)
    }

    /// Aggregate counts per status in a single round trip.
    pub async fn stats(&self) -> AppResult<RequestStats> {
        sqlx::query_as::<_, RequestStats>(
            "SELECT COUNT(*) FILTER (WHERE status = 'pending') AS pending, \
                    COUNT(*) FILTER (WHERE status = 'approved') AS approved, \
                    COUNT(*) FILTER (WHERE status = 'rejected') AS rejected, \
                    COUNT(*) AS total \
             FROM access_requests",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute request stats", e)
        })
    }

    /// Create a new access request.
    ///
    /// A partial unique index keeps at most one pending request per email;
    /// a second submission while one is pending maps to a conflict.
    pub async fn create(&self, data: &CreateAccessRequest) -> AppResult<AccessRequest> {
        sqlx::query_as::<_, AccessRequest>(
            "INSERT INTO access_requests \
                 (email, full_name, company, use_case, estimated_volume, message, \
                  cognitive_code, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&data.company)
        .bind(data.use_case)
        .bind(data.estimated_volume)
        .bind(&data.message)
        .bind(&data.cognitive_code)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("access_requests_pending_email_key") =>
            {
                AppError::conflict("A pending request for this email already exists".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create access request", e),
        })
    }

    /// Transition a pending request to approved, recording the checkout
    /// session issued for it. Runs inside the caller's transaction so the
    /// audit record commits with it.
    ///
    /// Returns `None` when the request is missing or no longer pending.
    pub async fn approve_tx(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        admin_id: Uuid,
        payment_session_id: &str,
        payment_checkout_url: &str,
        admin_notes: Option<&str>,
    ) -> AppResult<Option<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests \
             SET status = 'approved', approved_by = $2, approved_at = NOW(), \
                 payment_session_id = $3, payment_checkout_url = $4, \
                 admin_notes = COALESCE($5, admin_notes), updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING *",
        )
        .bind(id)
        .bind(admin_id)
        .bind(payment_session_id)
        .bind(payment_checkout_url)
        .bind(admin_notes)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to approve access request", e)
        })
    }

    /// Transition a pending request to rejected, inside the caller's
    /// transaction. The deciding admin is recorded in the audit log
    /// only; `approved_by` stays NULL for rejected requests.
    ///
    /// Returns `None` when the request is missing or no longer pending.
    pub async fn reject_tx(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        reason: &str,
        admin_notes: Option<&str>,
    ) -> AppResult<Option<AccessRequest>> {
        sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests \
             SET status = 'rejected', rejected_reason = $2, \
                 admin_notes = COALESCE($3, admin_notes), updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING *",
        )
        .bind(id)
        .bind(reason)
        .bind(admin_notes)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to reject access request", e)
        })
    }

    /// Mark a request as consumed into a tenant, inside the provisioning
    /// transaction.
    pub async fn mark_consumed_tx(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        tenant_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE access_requests \
             SET payment_confirmed = TRUE, tenant_id = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(tenant_id)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark request consumed", e)
        })?;
        Ok(())
    }

    /// Correlate a request with an already-existing tenant.
    ///
    /// Used on duplicate webhook deliveries where the tenant row already
    /// won the uniqueness race.
    pub async fn correlate_tenant(&self, id: Uuid, tenant_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE access_requests \
             SET payment_confirmed = TRUE, tenant_id = $2, updated_at = NOW() \
             WHERE id = $1 AND tenant_id IS NULL",
        )
        .bind(id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to correlate request", e)
        })?;
        Ok(())
    }
}
