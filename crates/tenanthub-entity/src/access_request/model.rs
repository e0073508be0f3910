//! Access request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::RequestStatus;
use super::use_case::UseCase;
use super::volume::EstimatedVolume;

/// A prospect's application for platform access.
///
/// At most one `pending` request may exist per email. A request that has
/// been consumed into a tenant carries the resulting `tenant_id`; the
/// exactly-once guarantee for consumption lives in the provisioning
/// transaction, not in `status` alone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessRequest {
    /// Unique request identifier; doubles as the payment correlation id.
    pub id: Uuid,
    /// Prospect email (unique among pending requests).
    pub email: String,
    /// Prospect full name.
    pub full_name: String,
    /// Prospect company.
    pub company: String,
    /// Declared use case.
    pub use_case: UseCase,
    /// Declared monthly volume bucket.
    pub estimated_volume: EstimatedVolume,
    /// Freeform message from the prospect.
    pub message: Option<String>,
    /// Opaque cognitive code supplied at submission (may be empty).
    #[serde(skip_serializing)]
    pub cognitive_code: Option<String>,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Admin who approved the request.
    pub approved_by: Option<Uuid>,
    /// When the request was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// Reason recorded on rejection.
    pub rejected_reason: Option<String>,
    /// Internal admin notes.
    pub admin_notes: Option<String>,
    /// Checkout session id at the payment processor.
    pub payment_session_id: Option<String>,
    /// Hosted checkout URL sent to the prospect.
    pub payment_checkout_url: Option<String>,
    /// Whether payment has been confirmed by the processor.
    pub payment_confirmed: bool,
    /// The tenant this request was consumed into, once provisioned.
    pub tenant_id: Option<Uuid>,
    /// IP address the request was submitted from.
    pub ip_address: Option<String>,
    /// User-Agent the request was submitted with.
    pub user_agent: Option<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
}

impl AccessRequest {
    /// Whether an admin decision may still be taken on this request.
    pub fn is_actionable(&self) -> bool {
        self.status.is_actionable()
    }

    /// Whether this request has been consumed into a tenant.
    pub fn is_consumed(&self) -> bool {
        self.tenant_id.is_some()
    }
}

/// Data required to create a new access request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccessRequest {
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
    /// Submitter IP address.
    pub ip_address: Option<String>,
    /// Submitter User-Agent.
    pub user_agent: Option<String>,
}
