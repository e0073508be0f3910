//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use tenanthub_core::config::AppConfig;
use tenanthub_payment::SignatureVerifier;
use tenanthub_service::{
    AccessRequestService, ApiKeyService, AuditService, ProvisioningService, TenantService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Webhook signature verifier
    pub signature_verifier: Arc<SignatureVerifier>,
    /// Access request state machine
    pub access_request_service: Arc<AccessRequestService>,
    /// Webhook-driven provisioning
    pub provisioning_service: Arc<ProvisioningService>,
    /// Tenant administration
    pub tenant_service: Arc<TenantService>,
    /// API key lifecycle
    pub api_key_service: Arc<ApiKeyService>,
    /// Audit log viewer
    pub audit_service: Arc<AuditService>,
}
