//! API key service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;
use tenanthub_credential::{PasswordHasher, SecretGenerator};
use tenanthub_database::repositories::{ApiKeyRepository, AuditRepository, TenantRepository};
use tenanthub_entity::api_key::model::{CreateApiKey, default_scopes};
use tenanthub_entity::api_key::{ApiKey, Environment};
use tenanthub_entity::audit::model::{CreateAuditRecord, actions};

use crate::context::RequestContext;

/// A freshly issued key, carrying the plaintext secret exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedKey {
    /// The persisted key row (hash omitted from serialization).
    pub key: ApiKey,
    /// Full plaintext secret; never retrievable again.
    pub secret: String,
}

/// Handles API key issuance and the revoke/reactivate lifecycle.
#[derive(Clone)]
pub struct ApiKeyService {
    pool: PgPool,
    key_repo: Arc<ApiKeyRepository>,
    tenant_repo: Arc<TenantRepository>,
    audit_repo: Arc<AuditRepository>,
    hasher: Arc<PasswordHasher>,
    generator: Arc<SecretGenerator>,
}

impl ApiKeyService {
    /// Creates a new API key service.
    pub fn new(
        pool: PgPool,
        key_repo: Arc<ApiKeyRepository>,
        tenant_repo: Arc<TenantRepository>,
        audit_repo: Arc<AuditRepository>,
        hasher: Arc<PasswordHasher>,
        generator: Arc<SecretGenerator>,
    ) -> Self {
        Self {
            pool,
            key_repo,
            tenant_repo,
            audit_repo,
            hasher,
            generator,
        }
    }

    /// Issue a new key for a tenant. The plaintext secret is returned
    /// exactly once; only its hash and display fragments persist.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        tenant_id: Uuid,
        environment: Environment,
        name: Option<String>,
    ) -> AppResult<IssuedKey> {
        let tenant = self
            .tenant_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tenant {tenant_id} not found")))?;

        let secret = self.generator.api_key(environment);
        let key_hash = self.hasher.hash(&secret.full_key)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let key = self
            .key_repo
            .create_tx(
                &mut *tx,
                &CreateApiKey {
                    tenant_id: tenant.id,
                    key_hash,
                    key_prefix: secret.prefix.clone(),
                    last_four: secret.last_four.clone(),
                    name,
                    environment,
                    scopes: default_scopes(),
                },
            )
            .await?;

        self.audit_repo
            .create_tx(
                &mut *tx,
                &CreateAuditRecord {
                    actor_id: ctx.admin_id,
                    actor_label: ctx.admin_email.clone(),
                    action: actions::API_KEY_GENERATED.to_string(),
                    entity_type: "ApiKey".to_string(),
                    entity_id: key.id,
                    changes: Some(json!({
                        "tenant_id": tenant.id,
                        "environment": environment,
                        "key_prefix": key.key_prefix,
                        "last_four": key.last_four,
                    })),
                    ip_address: ctx.ip_address.clone(),
                    user_agent: ctx.user_agent.clone(),
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(key_id = %key.id, tenant_id = %tenant.id, "API key generated");

        Ok(IssuedKey {
            key,
            secret: secret.full_key,
        })
    }

    /// Toggle a key active or inactive. Idempotent; audits the
    /// transition with previous/next in the same transaction. Rows are
    /// never deleted.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        is_active: bool,
    ) -> AppResult<ApiKey> {
        let existing = self
            .key_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("API key {id} not found")))?;

        if existing.is_active == is_active {
            return Ok(existing);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let updated = self
            .key_repo
            .set_active_tx(&mut *tx, id, is_active)
            .await?
            .ok_or_else(|| AppError::not_found(format!("API key {id} not found")))?;

        let action = if is_active {
            actions::API_KEY_REACTIVATED
        } else {
            actions::API_KEY_REVOKED
        };

        self.audit_repo
            .create_tx(
                &mut *tx,
                &CreateAuditRecord {
                    actor_id: ctx.admin_id,
                    actor_label: ctx.admin_email.clone(),
                    action: action.to_string(),
                    entity_type: "ApiKey".to_string(),
                    entity_id: id,
                    changes: Some(json!({
                        "previous": existing.is_active,
                        "next": is_active,
                    })),
                    ip_address: ctx.ip_address.clone(),
                    user_agent: ctx.user_agent.clone(),
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(key_id = %id, is_active, "API key toggled");
        Ok(updated)
    }

    /// List keys, masked, optionally scoped to one tenant.
    pub async fn list(&self, tenant_id: Option<Uuid>) -> AppResult<Vec<ApiKey>> {
        match tenant_id {
            Some(id) => self.key_repo.find_by_tenant(id).await,
            None => self.key_repo.find_all().await,
        }
    }
}
