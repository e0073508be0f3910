//! Provisioning service: turns confirmed payments into tenants.
//!
//! Exactly-once provisioning rests on two pillars: the idempotency
//! checks at the top of `provision_from_checkout`, and the UNIQUE
//! constraint on `tenants.email` which makes the second of two racing
//! transactions roll back without side effects.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use tenanthub_core::config::ProvisioningConfig;
use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;
use tenanthub_credential::{PasswordHasher, SecretGenerator};
use tenanthub_database::repositories::{
    AccessRequestRepository, AuditRepository, TenantRepository,
};
use tenanthub_entity::access_request::AccessRequest;
use tenanthub_entity::audit::model::{CreateAuditRecord, actions};
use tenanthub_entity::tenant::metadata::TenantMetadata;
use tenanthub_entity::tenant::model::CreateTenant;
use tenanthub_entity::tenant::{Plan, TenantStatus};
use tenanthub_notify::templates;
use tenanthub_notify::Notifier;
use tenanthub_payment::event::{CHECKOUT_COMPLETED, SUBSCRIPTION_DELETED};
use tenanthub_payment::{CheckoutSessionPayload, SubscriptionPayload, WebhookEvent};

use crate::context::RequestContext;

/// Handles verified webhook events: tenant provisioning on checkout
/// completion and cancellation on subscription deletion.
#[derive(Clone)]
pub struct ProvisioningService {
    pool: PgPool,
    request_repo: Arc<AccessRequestRepository>,
    tenant_repo: Arc<TenantRepository>,
    audit_repo: Arc<AuditRepository>,
    hasher: Arc<PasswordHasher>,
    generator: Arc<SecretGenerator>,
    notifier: Arc<dyn Notifier>,
    config: ProvisioningConfig,
    dashboard_url: String,
}

impl ProvisioningService {
    /// Creates a new provisioning service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        request_repo: Arc<AccessRequestRepository>,
        tenant_repo: Arc<TenantRepository>,
        audit_repo: Arc<AuditRepository>,
        hasher: Arc<PasswordHasher>,
        generator: Arc<SecretGenerator>,
        notifier: Arc<dyn Notifier>,
        config: ProvisioningConfig,
        dashboard_url: String,
    ) -> Self {
        Self {
            pool,
            request_repo,
            tenant_repo,
            audit_repo,
            hasher,
            generator,
            notifier,
            config,
            dashboard_url,
        }
    }

    /// Dispatch one verified webhook event. Unknown event types are
    /// acknowledged without side effects so the processor stops
    /// redelivering them.
    pub async fn handle_event(&self, event: &WebhookEvent) -> AppResult<()> {
        match event.event_type.as_str() {
            CHECKOUT_COMPLETED => {
                let session = event.checkout_session()?;
                self.provision_from_checkout(&session).await
            }
            SUBSCRIPTION_DELETED => {
                let subscription = event.subscription()?;
                self.cancel_subscription(&subscription).await
            }
            other => {
                info!(event_type = %other, "Ignoring unhandled webhook event");
                Ok(())
            }
        }
    }

    /// Provision a tenant from a completed checkout session.
    ///
    /// Returns Ok on every idempotent-skip path: a missing correlation
    /// id, an unknown request, or a tenant that already exists all
    /// acknowledge the delivery instead of triggering a retry storm.
    pub async fn provision_from_checkout(
        &self,
        session: &CheckoutSessionPayload,
    ) -> AppResult<()> {
        let Some(reference) = session.client_reference_id.as_deref() else {
            warn!(session_id = %session.id, "Checkout session without reference id");
            return Ok(());
        };
        let Ok(request_id) = Uuid::parse_str(reference) else {
            warn!(session_id = %session.id, reference = %reference, "Unparseable reference id");
            return Ok(());
        };

        let Some(request) = self.request_repo.find_by_id(request_id).await? else {
            warn!(request_id = %request_id, "Checkout for unknown access request");
            return Ok(());
        };

        // Fast idempotency path: a tenant with this email already exists,
        // so a previous delivery won. Correlate and acknowledge.
        if let Some(existing) = self.tenant_repo.find_by_email(&request.email).await? {
            info!(
                request_id = %request_id,
                tenant_id = %existing.id,
                "Tenant already provisioned; correlating"
            );
            self.request_repo
                .correlate_tenant(request_id, existing.id)
                .await?;
            return Ok(());
        }

        let plan = session
            .metadata
            .plan
            .as_deref()
            .and_then(|p| Plan::from_str(p).ok())
            .unwrap_or_default();

        match self.provision(&request, session, plan).await {
            Ok(None) => Ok(()),
            Ok(Some((tenant_id, password))) => {
                info!(
                    request_id = %request_id,
                    tenant_id = %tenant_id,
                    plan = %plan,
                    "Tenant provisioned from payment"
                );
                let message = templates::welcome(
                    &request.full_name,
                    &request.email,
                    &password,
                    &self.dashboard_url,
                );
                if let Err(e) = self
                    .notifier
                    .send(&request.email, &message.subject, &message.html)
                    .await
                {
                    warn!(tenant_id = %tenant_id, error = %e, "Failed to send welcome email");
                }
                Ok(())
            }
            // Lost the uniqueness race to a concurrent delivery; the
            // other transaction committed the tenant, so resolve as the
            // correlate path.
            Err(e) if e.kind == ErrorKind::Conflict => {
                if let Some(existing) = self.tenant_repo.find_by_email(&request.email).await? {
                    info!(
                        request_id = %request_id,
                        tenant_id = %existing.id,
                        "Lost provisioning race; correlating"
                    );
                    self.request_repo
                        .correlate_tenant(request_id, existing.id)
                        .await?;
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// The provisioning transaction proper. Returns the new tenant id
    /// and the plaintext temporary password for the welcome email, or
    /// `None` when the request turned out to be consumed already.
    async fn provision(
        &self,
        request: &AccessRequest,
        session: &CheckoutSessionPayload,
        plan: Plan,
    ) -> AppResult<Option<(Uuid, String)>> {
        let password = self
            .generator
            .temporary_password(self.config.password_length);
        let password_hash = self.hasher.hash(&password)?;
        let cognitive_code_hash = match request.cognitive_code.as_deref() {
            Some(code) if !code.is_empty() => Some(self.hasher.hash(code)?),
            _ => None,
        };

        let now = Utc::now();
        let ctx = RequestContext::system_webhook();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Re-read under lock: another delivery may have consumed the
        // request between our pool read and this transaction.
        let locked = self
            .request_repo
            .find_by_id_tx(&mut *tx, request.id)
            .await?;
        if locked.is_none_or(|r| r.is_consumed()) {
            return Ok(None);
        }

        let tenant = self
            .tenant_repo
            .create_tx(
                &mut *tx,
                &CreateTenant {
                    email: request.email.clone(),
                    full_name: request.full_name.clone(),
                    company: request.company.clone(),
                    plan,
                    monthly_quota: plan.monthly_quota(),
                    password_hash,
                    cognitive_code_hash,
                    trial_ends_at: now + Duration::days(self.config.trial_days),
                    subscription_started_at: now,
                    metadata: TenantMetadata {
                        access_request_id: request.id,
                        payment_session_id: Some(session.id.clone()),
                        payment_customer_id: session.customer.clone(),
                        payment_subscription_id: session.subscription.clone(),
                        use_case: request.use_case,
                        estimated_volume: request.estimated_volume,
                        source: "payment_webhook".to_string(),
                    },
                },
            )
            .await?;

        self.request_repo
            .mark_consumed_tx(&mut *tx, request.id, tenant.id)
            .await?;

        self.audit_repo
            .create_tx(
                &mut *tx,
                &CreateAuditRecord {
                    actor_id: ctx.admin_id,
                    actor_label: ctx.admin_email.clone(),
                    action: actions::TENANT_CREATED_FROM_PAYMENT.to_string(),
                    entity_type: "Tenant".to_string(),
                    entity_id: tenant.id,
                    changes: Some(serde_json::json!({
                        "access_request_id": request.id,
                        "payment_session_id": session.id,
                        "plan": plan,
                    })),
                    ip_address: None,
                    user_agent: None,
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(Some((tenant.id, password)))
    }

    /// Cancel the tenant tied to a deleted subscription. A missing
    /// tenant is a legitimate out-of-order delivery, acknowledged
    /// without side effects.
    pub async fn cancel_subscription(&self, subscription: &SubscriptionPayload) -> AppResult<()> {
        let Some(tenant) = self
            .tenant_repo
            .find_by_payment_customer(&subscription.customer)
            .await?
        else {
            info!(
                customer = %subscription.customer,
                "Subscription deleted for unknown customer"
            );
            return Ok(());
        };

        if tenant.status == TenantStatus::Cancelled {
            return Ok(());
        }

        let ctx = RequestContext::system_webhook();
        let previous = tenant.status;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        self.tenant_repo
            .update_status_tx(&mut *tx, tenant.id, TenantStatus::Cancelled)
            .await?;

        self.audit_repo
            .create_tx(
                &mut *tx,
                &CreateAuditRecord {
                    actor_id: ctx.admin_id,
                    actor_label: ctx.admin_email.clone(),
                    action: actions::TENANT_SUBSCRIPTION_CANCELLED.to_string(),
                    entity_type: "Tenant".to_string(),
                    entity_id: tenant.id,
                    changes: Some(serde_json::json!({
                        "previous_status": previous,
                        "next_status": TenantStatus::Cancelled,
                        "payment_subscription_id": subscription.id,
                    })),
                    ip_address: None,
                    user_agent: None,
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(tenant_id = %tenant.id, "Tenant subscription cancelled");
        Ok(())
    }
}
