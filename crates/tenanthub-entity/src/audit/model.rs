//! Audit record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Well-known audit action tags.
pub mod actions {
    /// An access request was approved and a payment link issued.
    pub const ACCESS_REQUEST_APPROVED: &str = "ACCESS_REQUEST_APPROVED";
    /// An access request was rejected.
    pub const ACCESS_REQUEST_REJECTED: &str = "ACCESS_REQUEST_REJECTED";
    /// A tenant was provisioned from a confirmed payment.
    pub const TENANT_CREATED_FROM_PAYMENT: &str = "TENANT_CREATED_FROM_PAYMENT";
    /// A tenant's subscription was cancelled at the processor.
    pub const TENANT_SUBSCRIPTION_CANCELLED: &str = "TENANT_SUBSCRIPTION_CANCELLED";
    /// An admin edited tenant fields.
    pub const TENANT_UPDATED: &str = "TENANT_UPDATED";
    /// A tenant's login password was regenerated.
    pub const TENANT_CREDENTIALS_RESET: &str = "TENANT_CREDENTIALS_RESET";
    /// An API key was generated.
    pub const API_KEY_GENERATED: &str = "API_KEY_GENERATED";
    /// An API key was revoked.
    pub const API_KEY_REVOKED: &str = "API_KEY_REVOKED";
    /// An API key was reactivated.
    pub const API_KEY_REACTIVATED: &str = "API_KEY_REACTIVATED";
}

/// An immutable audit record documenting one administrative mutation.
///
/// Always written in the same database transaction as the mutation it
/// describes; no update or delete operations exist.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// Acting admin id, or the nil UUID for system actors.
    pub actor_id: Uuid,
    /// Human-readable actor label (admin email or system identity).
    pub actor_label: String,
    /// Action tag (see [`actions`]).
    pub action: String,
    /// Type of the mutated entity (e.g. `"Tenant"`).
    pub entity_type: String,
    /// Id of the mutated entity.
    pub entity_id: Uuid,
    /// Structured diff/changes payload.
    pub changes: Option<serde_json::Value>,
    /// Actor IP address.
    pub ip_address: Option<String>,
    /// Actor User-Agent.
    pub user_agent: Option<String>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditRecord {
    /// Acting admin id, or the nil UUID for system actors.
    pub actor_id: Uuid,
    /// Human-readable actor label.
    pub actor_label: String,
    /// Action tag.
    pub action: String,
    /// Type of the mutated entity.
    pub entity_type: String,
    /// Id of the mutated entity.
    pub entity_id: Uuid,
    /// Structured diff/changes payload.
    pub changes: Option<serde_json::Value>,
    /// Actor IP address.
    pub ip_address: Option<String>,
    /// Actor User-Agent.
    pub user_agent: Option<String>,
}
