//! Audit viewer service.

use std::sync::Arc;

use uuid::Uuid;

use tenanthub_core::result::AppResult;
use tenanthub_core::types::pagination::{PageRequest, PageResponse};
use tenanthub_database::repositories::AuditRepository;
use tenanthub_entity::audit::AuditRecord;

/// Read-only access to the audit log for the admin viewer. Writes go
/// through `AuditRepository::create_tx` inside each mutation's own
/// transaction, never through this service.
#[derive(Clone)]
pub struct AuditService {
    audit_repo: Arc<AuditRepository>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit_repo: Arc<AuditRepository>) -> Self {
        Self { audit_repo }
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
        self.audit_repo
            .search(actor_id, action, entity_type, entity_id, page)
            .await
    }
}
