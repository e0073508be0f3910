//! Access request service: the admin decision state machine.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use tenanthub_core::error::{AppError, ErrorKind};
use tenanthub_core::result::AppResult;
use tenanthub_core::types::pagination::{PageRequest, PageResponse};
use tenanthub_database::repositories::{AccessRequestRepository, AuditRepository};
use tenanthub_entity::access_request::model::CreateAccessRequest;
use tenanthub_entity::access_request::{AccessRequest, EstimatedVolume, RequestStatus, UseCase};
use tenanthub_entity::audit::model::{CreateAuditRecord, actions};
use tenanthub_entity::tenant::Plan;
use tenanthub_notify::templates;
use tenanthub_notify::Notifier;
use tenanthub_payment::{CheckoutRequest, PaymentGateway};

use crate::context::RequestContext;

/// Public submission payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Prospect email.
    pub email: String,
    /// Prospect full name.
    pub full_name: String,
    /// Prospect company.
    pub company: String,
    /// Declared use case.
    pub use_case: UseCase,
    /// Declared monthly volume bucket.
    pub estimated_volume: EstimatedVolume,
    /// Freeform message.
    pub message: Option<String>,
    /// Opaque cognitive code.
    pub cognitive_code: Option<String>,
}

/// Stats snapshot for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct RequestStatsView {
    /// Requests awaiting a decision.
    pub pending: i64,
    /// Requests approved since midnight UTC.
    pub approved_today: u64,
    /// All requests ever submitted.
    pub total: i64,
    /// Approved over decided (approved + rejected); 0 when nothing was
    /// decided yet.
    pub conversion_rate: f64,
}

/// Result of an approval: the updated request plus the checkout link
/// issued for it.
#[derive(Debug, Clone, Serialize)]
pub struct ApproveOutcome {
    /// The approved request.
    pub request: AccessRequest,
    /// Hosted checkout URL handed to the prospect.
    pub checkout_url: String,
}

/// Handles the access request decision state machine.
///
/// Approval issues a payment link; it never creates a tenant. Tenants
/// are only ever born in the provisioning transaction once payment is
/// confirmed.
#[derive(Clone)]
pub struct AccessRequestService {
    pool: PgPool,
    request_repo: Arc<AccessRequestRepository>,
    audit_repo: Arc<AuditRepository>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
}

impl AccessRequestService {
    /// Creates a new access request service.
    pub fn new(
        pool: PgPool,
        request_repo: Arc<AccessRequestRepository>,
        audit_repo: Arc<AuditRepository>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pool,
            request_repo,
            audit_repo,
            gateway,
            notifier,
        }
    }

    /// Public prospect submission. Creates a `pending` request; a second
    /// submission while one is pending maps to a conflict.
    pub async fn submit(
        &self,
        req: SubmitRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<AccessRequest> {
        if !req.email.contains('@') || !req.email.contains('.') {
            return Err(AppError::validation("Invalid email format"));
        }
        if req.full_name.trim().is_empty() {
            return Err(AppError::validation("Full name cannot be empty"));
        }
        if req.company.trim().is_empty() {
            return Err(AppError::validation("Company cannot be empty"));
        }

        let request = self
            .request_repo
            .create(&CreateAccessRequest {
                email: req.email.trim().to_lowercase(),
                full_name: req.full_name.trim().to_string(),
                company: req.company.trim().to_string(),
                use_case: req.use_case,
                estimated_volume: req.estimated_volume,
                message: req.message,
                cognitive_code: req.cognitive_code,
                ip_address,
                user_agent,
            })
            .await?;

        info!(request_id = %request.id, "Access request submitted");
        Ok(request)
    }

    /// Fetch one request.
    pub async fn get(&self, id: Uuid) -> AppResult<AccessRequest> {
        self.request_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Access request {id} not found")))
    }

    /// List requests with filters and pagination.
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        use_case: Option<UseCase>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AccessRequest>> {
        self.request_repo
            .find_all(status, use_case, search, page)
            .await
    }

    /// Count requests, optionally in one status.
    pub async fn count(&self, status: Option<RequestStatus>) -> AppResult<u64> {
        match status {
            Some(s) => self.request_repo.count_by_status(s).await,
            None => {
                let stats = self.request_repo.stats().await?;
                Ok(stats.total as u64)
            }
        }
    }

    /// Dashboard stats snapshot.
    pub async fn stats(&self) -> AppResult<RequestStatsView> {
        let stats = self.request_repo.stats().await?;
        let midnight = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();
        let approved_today = self.request_repo.count_approved_since(midnight).await?;

        let decided = stats.approved + stats.rejected;
        let conversion_rate = if decided > 0 {
            stats.approved as f64 / decided as f64
        } else {
            0.0
        };

        Ok(RequestStatsView {
            pending: stats.pending,
            approved_today,
            total: stats.total,
            conversion_rate,
        })
    }

    /// Approve a pending request: create a checkout session for the
    /// chosen plan, record it transactionally with the audit entry, then
    /// best-effort email the payment link.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        plan: Plan,
        notes: Option<String>,
    ) -> AppResult<ApproveOutcome> {
        let request = self.get(id).await?;
        if !request.is_actionable() {
            return Err(AppError::already_processed(format!(
                "Access request {id} was already processed"
            )));
        }

        // The session is created before the transaction; a crash between
        // the two leaves an orphan session at the processor, which is
        // harmless and expires on its own.
        let session = self
            .gateway
            .create_checkout_session(&CheckoutRequest {
                reference_id: request.id,
                customer_email: request.email.clone(),
                plan: plan.to_string(),
            })
            .await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let updated = self
            .request_repo
            .approve_tx(
                &mut *tx,
                id,
                ctx.admin_id,
                &session.id,
                &session.url,
                notes.as_deref(),
            )
            .await?
            .ok_or_else(|| {
                AppError::already_processed(format!("Access request {id} was already processed"))
            })?;

        self.audit_repo
            .create_tx(
                &mut *tx,
                &CreateAuditRecord {
                    actor_id: ctx.admin_id,
                    actor_label: ctx.admin_email.clone(),
                    action: actions::ACCESS_REQUEST_APPROVED.to_string(),
                    entity_type: "AccessRequest".to_string(),
                    entity_id: id,
                    changes: Some(serde_json::json!({
                        "plan": plan,
                        "payment_session_id": session.id,
                    })),
                    ip_address: ctx.ip_address.clone(),
                    user_agent: ctx.user_agent.clone(),
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(request_id = %id, plan = %plan, "Access request approved");

        let message = templates::payment_link(&updated.full_name, plan.as_str(), &session.url);
        if let Err(e) = self
            .notifier
            .send(&updated.email, &message.subject, &message.html)
            .await
        {
            warn!(request_id = %id, error = %e, "Failed to send payment link email");
        }

        Ok(ApproveOutcome {
            request: updated,
            checkout_url: session.url,
        })
    }

    /// Reject a pending request, transactionally with its audit entry;
    /// optionally emails the prospect.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        reason: String,
        notes: Option<String>,
        send_email: bool,
    ) -> AppResult<AccessRequest> {
        if reason.trim().is_empty() {
            return Err(AppError::validation("Rejection reason cannot be empty"));
        }

        let request = self.get(id).await?;
        if !request.is_actionable() {
            return Err(AppError::already_processed(format!(
                "Access request {id} was already processed"
            )));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let updated = self
            .request_repo
            .reject_tx(&mut *tx, id, &reason, notes.as_deref())
            .await?
            .ok_or_else(|| {
                AppError::already_processed(format!("Access request {id} was already processed"))
            })?;

        self.audit_repo
            .create_tx(
                &mut *tx,
                &CreateAuditRecord {
                    actor_id: ctx.admin_id,
                    actor_label: ctx.admin_email.clone(),
                    action: actions::ACCESS_REQUEST_REJECTED.to_string(),
                    entity_type: "AccessRequest".to_string(),
                    entity_id: id,
                    changes: Some(serde_json::json!({ "reason": reason })),
                    ip_address: ctx.ip_address.clone(),
                    user_agent: ctx.user_agent.clone(),
                },
            )
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(request_id = %id, "Access request rejected");

        if send_email {
            let message = templates::rejection(&updated.full_name, &reason);
            if let Err(e) = self
                .notifier
                .send(&updated.email, &message.subject, &message.html)
                .await
            {
                warn!(request_id = %id, error = %e, "Failed to send rejection email");
            }
        }

        Ok(updated)
    }
}
