//! API key repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;
use tenanthub_entity::api_key::model::CreateApiKey;
use tenanthub_entity::api_key::ApiKey;

/// Repository for tenant API keys.
#[derive(Debug, Clone)]
pub struct ApiKeyRepository {
    pool: PgPool,
}

impl ApiKeyRepository {
    /// Create a new API key repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a key by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ApiKey>> {
        sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find API key", e))
    }

    /// List all keys owned by a tenant, newest first.
    pub async fn find_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<ApiKey>> {
        sqlx::query_as::<_, ApiKey>(
            "SELECT * FROM api_keys WHERE tenant_id = $1 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list API keys", e))
    }

    /// List every key across tenants, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<ApiKey>> {
        sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list API keys", e))
    }

    /// Persist a new key inside the caller's transaction, so the audit
    /// record commits with it.
    pub async fn create_tx(&self, conn: &mut PgConnection, data: &CreateApiKey) -> AppResult<ApiKey> {
        sqlx::query_as::<_, ApiKey>(
            "INSERT INTO api_keys \
                 (tenant_id, key_hash, key_prefix, last_four, name, environment, scopes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(data.tenant_id)
        .bind(&data.key_hash)
        .bind(&data.key_prefix)
        .bind(&data.last_four)
        .bind(&data.name)
        .bind(data.environment)
        .bind(&data.scopes)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create API key", e))
    }

    /// Flip a key's active flag inside the caller's transaction.
    /// Returns `None` when the key is missing.
    pub async fn set_active_tx(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        active: bool,
    ) -> AppResult<Option<ApiKey>> {
        sqlx::query_as::<_, ApiKey>(
            "UPDATE api_keys SET is_active = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update API key", e))
    }
}
