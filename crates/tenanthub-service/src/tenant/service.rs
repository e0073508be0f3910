//! Tenant administration service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;
use tenanthub_core::types::pagination::{PageRequest, PageResponse};
use tenanthub_credential::{PasswordHasher, SecretGenerator};
use tenanthub_database::repositories::{AuditRepository, TenantRepository};
use tenanthub_entity::audit::model::{CreateAuditRecord, actions};
use tenanthub_entity::tenant::model::UpdateTenant;
use tenanthub_entity::tenant::{Tenant, TenantStatus};
use tenanthub_notify::templates;
use tenanthub_notify::Notifier;

use crate::context::RequestContext;

/// Result of a credential reset.
///
/// `password` is populated only when email delivery failed, so the
/// admin can hand the credentials over out of band.
#[derive(Debug, Clone, Serialize)]
pub struct ResendOutcome {
    /// Whether the notification email was delivered.
    pub email_sent: bool,
    /// The plaintext temporary password, present only when the email
    /// could not be delivered.
    pub password: Option<String>,
}

/// Handles admin operations on provisioned tenants.
#[derive(Clone)]
pub struct TenantService {
    pool: PgPool,
    tenant_repo: Arc<TenantRepository>,
    audit_repo: Arc<AuditRepository>,
    hasher: Arc<PasswordHasher>,
    generator: Arc<SecretGenerator>,
    notifier: Arc<dyn Notifier>,
    password_length: usize,
    dashboard_url: String,
}

impl TenantService {
    /// Creates a new tenant service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        tenant_repo: Arc<TenantRepository>,
        audit_repo: Arc<AuditRepository>,
        hasher: Arc<PasswordHasher>,
        generator: Arc<SecretGenerator>,
        notifier: Arc<dyn Notifier>,
        password_length: usize,
        dashboard_url: String,
    ) -> Self {
        Self {
            pool,
            tenant_repo,
            audit_repo,
            hasher,
            generator,
            notifier,
            password_length,
            dashboard_url,
        }
    }

    /// Fetch one tenant.
    pub async fn get(&self, id: Uuid) -> AppResult<Tenant> {
        self.tenant_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tenant {id} not found")))
    }

    /// List tenants with filters and pagination.
    pub async fn list(
        &self,
        status: Option<TenantStatus>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Tenant>> {
        self.tenant_repo.find_all(status, search, page).await
    }

    /// Apply an admin edit and write a diffed audit record in the same
    /// transaction.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        data: UpdateTenant,
    ) -> AppResult<Tenant> {
        if data.is_empty() {
            return Err(AppError::validation("Update contains no changes"));
        }

        let before = self.get(id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let after = self.tenant_repo.update_tx(&mut *tx, id, &data).await?;

        self.audit_repo
            .create_tx(
                &mut *tx,
                &CreateAuditRecord {
                    actor_id: ctx.admin_id,
                    actor_label: ctx.admin_email.clone(),
                    action: actions::TENANT_UPDATED.to_string(),
                    entity_type: "Tenant".to_string(),
                    entity_id: id,
                    changes: Some(diff_tenant(&before, &after)),
                    ip_address: ctx.ip_address.clone(),
                    user_agent: ctx.user_agent.clone(),
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(tenant_id = %id, admin = %ctx.admin_email, "Tenant updated");
        Ok(after)
    }

    /// Regenerate a tenant's login password, audit the reset, and try to
    /// email the new credentials. When the email fails the plaintext is
    /// returned to the caller instead.
    pub async fn resend_credentials(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> AppResult<ResendOutcome> {
        let tenant = self.get(id).await?;

        let password = self.generator.temporary_password(self.password_length);
        let password_hash = self.hasher.hash(&password)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        self.tenant_repo
            .update_password_tx(&mut *tx, id, &password_hash)
            .await?;

        self.audit_repo
            .create_tx(
                &mut *tx,
                &CreateAuditRecord {
                    actor_id: ctx.admin_id,
                    actor_label: ctx.admin_email.clone(),
                    action: actions::TENANT_CREDENTIALS_RESET.to_string(),
                    entity_type: "Tenant".to_string(),
                    entity_id: id,
                    changes: None,
                    ip_address: ctx.ip_address.clone(),
                    user_agent: ctx.user_agent.clone(),
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(tenant_id = %id, admin = %ctx.admin_email, "Tenant credentials reset");

        let message = templates::credentials_reset(
            &tenant.full_name,
            &tenant.email,
            &password,
            &self.dashboard_url,
        );
        match self
            .notifier
            .send(&tenant.email, &message.subject, &message.html)
            .await
        {
            Ok(()) => Ok(ResendOutcome {
                email_sent: true,
                password: None,
            }),
            Err(e) => {
                warn!(tenant_id = %id, error = %e, "Failed to send credentials email");
                Ok(ResendOutcome {
                    email_sent: false,
                    password: Some(password),
                })
            }
        }
    }
}

/// Build a previous/next change set over the admin-editable fields.
fn diff_tenant(before: &Tenant, after: &Tenant) -> serde_json::Value {
    let mut changes = serde_json::Map::new();

    if before.plan != after.plan {
        changes.insert("plan".into(), json!({"previous": before.plan, "next": after.plan}));
    }
    if before.status != after.status {
        changes.insert(
            "status".into(),
            json!({"previous": before.status, "next": after.status}),
        );
    }
    if before.monthly_quota != after.monthly_quota {
        changes.insert(
            "monthly_quota".into(),
            json!({"previous": before.monthly_quota, "next": after.monthly_quota}),
        );
    }
    if before.internal_notes != after.internal_notes {
        changes.insert(
            "internal_notes".into(),
            json!({"previous": before.internal_notes, "next": after.internal_notes}),
        );
    }
    if before.trial_ends_at != after.trial_ends_at {
        changes.insert(
            "trial_ends_at".into(),
            json!({"previous": before.trial_ends_at, "next": after.trial_ends_at}),
        );
    }
    if before.subscription_ends_at != after.subscription_ends_at {
        changes.insert(
            "subscription_ends_at".into(),
            json!({"previous": before.subscription_ends_at, "next": after.subscription_ends_at}),
        );
    }

    serde_json::Value::Object(changes)
}
