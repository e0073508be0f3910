//! Tenant repository implementation.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;
use tenanthub_core::types::pagination::{PageRequest, PageResponse};
use tenanthub_entity::tenant::model::{CreateTenant, UpdateTenant};
use tenanthub_entity::tenant::{Tenant, TenantStatus};

/// Repository for tenant persistence and queries.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    /// Create a new tenant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a tenant by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tenant", e))
    }

    /// Find a tenant by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find tenant by email", e)
            })
    }

    /// Find a tenant by the payment processor's customer id recorded in
    /// provisioning metadata.
    pub async fn find_by_payment_customer(&self, customer_id: &str) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE metadata->>'payment_customer_id' = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find tenant by customer", e)
        })
    }

    /// List tenants with optional status filter and text search over
    /// email, name, and company.
    pub async fn find_all(
        &self,
        status: Option<TenantStatus>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Tenant>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
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

        let count_sql = format!("SELECT COUNT(*) FROM tenants {where_clause}");
        let select_sql = format!(
            "SELECT * FROM tenants {where_clause} ORDER BY created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, Tenant>(&select_sql);

        if let Some(s) = status {
            count_query = count_query.bind(s);
            select_query = select_query.bind(s);
        }
        if let Some(q) = search {
            let pattern = format!("%{q}%");
            count_query = count_query.bind(pattern.clone());
            select_query = select_query.bind(pattern);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count tenants", e))?;

        let tenants = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tenants", e))?;

        Ok(PageResponse::new(
            tenants,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a tenant inside the provisioning transaction.
    ///
    /// The unique constraint on `email` is the exactly-once arbiter: the
    /// second of two racing provisioning attempts fails here and rolls
    /// back without side effects.
    pub async fn create_tx(&self, conn: &mut PgConnection, data: &CreateTenant) -> AppResult<Tenant> {
        sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants \
                 (email, full_name, company, plan, status, monthly_quota, password_hash, \
                  cognitive_code_hash, trial_ends_at, subscription_started_at, metadata) \
             VALUES ($1, $2, $3, $4, 'trial', $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&data.company)
        .bind(data.plan)
        .bind(data.monthly_quota)
        .bind(&data.password_hash)
        .bind(&data.cognitive_code_hash)
        .bind(data.trial_ends_at)
        .bind(data.subscription_started_at)
        .bind(Json(&data.metadata))
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("tenants_email_key") => {
                AppError::conflict(format!("Tenant with email '{}' already exists", data.email))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create tenant", e),
        })
    }

    /// Apply an admin edit inside the caller's transaction; `None`
    /// fields are left untouched.
    pub async fn update_tx(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        data: &UpdateTenant,
    ) -> AppResult<Tenant> {
        if data.is_empty() {
            return sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
                .bind(id)
                .fetch_optional(conn)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to find tenant", e)
                })?
                .ok_or_else(|| AppError::not_found(format!("Tenant {id} not found")));
        }

        let mut sets = Vec::new();
        let mut param_idx = 2u32;

        if data.plan.is_some() {
            sets.push(format!("plan = ${param_idx}"));
            param_idx += 1;
        }
        if data.status.is_some() {
            sets.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if data.monthly_quota.is_some() {
            sets.push(format!("monthly_quota = ${param_idx}"));
            param_idx += 1;
        }
        if data.internal_notes.is_some() {
            sets.push(format!("internal_notes = ${param_idx}"));
            param_idx += 1;
        }
        if data.trial_ends_at.is_some() {
            sets.push(format!("trial_ends_at = ${param_idx}"));
            param_idx += 1;
        }
        if data.subscription_ends_at.is_some() {
            sets.push(format!("subscription_ends_at = ${param_idx}"));
            param_idx += 1;
        }
        sets.push("updated_at = NOW()".to_string());
        let _ = param_idx;

        let sql = format!(
            "UPDATE tenants SET {} WHERE id = $1 RETURNING *",
            sets.join(", ")
        );

        let mut query = sqlx::query_as::<_, Tenant>(&sql).bind(id);
        if let Some(plan) = data.plan {
            query = query.bind(plan);
        }
        if let Some(status) = data.status {
            query = query.bind(status);
        }
        if let Some(quota) = data.monthly_quota {
            query = query.bind(quota);
        }
        if let Some(notes) = &data.internal_notes {
            query = query.bind(notes.clone());
        }
        if let Some(trial) = &data.trial_ends_at {
            query = query.bind(*trial);
        }
        if let Some(sub_end) = &data.subscription_ends_at {
            query = query.bind(*sub_end);
        }

        query
            .fetch_optional(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update tenant", e))?
            .ok_or_else(|| AppError::not_found(format!("Tenant {id} not found")))
    }

    /// Update a tenant's status inside the caller's transaction.
    pub async fn update_status_tx(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: TenantStatus,
    ) -> AppResult<Tenant> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update tenant status", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Tenant {id} not found")))
    }

    /// Replace the login password hash and require a change at next
    /// login, inside the caller's transaction.
    pub async fn update_password_tx(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        password_hash: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE tenants \
             SET password_hash = $2, must_change_password = TRUE, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update tenant password", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Tenant {id} not found")));
        }
        Ok(())
    }

    /// Count total tenants.
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count tenants", e))?;
        Ok(count as u64)
    }
}
