//! Tenant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::metadata::TenantMetadata;
use super::plan::Plan;
use super::status::TenantStatus;

/// A provisioned customer account.
///
/// Created exactly once by the provisioning transaction; `email` is
/// unique across the whole tenant population and is the arbiter of the
/// exactly-once provisioning guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: Uuid,
    /// Login email; unique across all tenants.
    pub email: String,
    /// Contact full name, copied from the access request.
    pub full_name: String,
    /// Company name, copied from the access request.
    pub company: String,
    /// Commercial plan.
    pub plan: Plan,
    /// Account status.
    pub status: TenantStatus,
    /// Monthly request quota.
    pub monthly_quota: i64,
    /// Requests consumed in the current month.
    pub current_usage: i64,
    /// Argon2id hash of the login password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Argon2id hash of the cognitive code, when one was supplied.
    #[serde(skip_serializing)]
    pub cognitive_code_hash: Option<String>,
    /// Whether the tenant must change the temporary password at first login.
    pub must_change_password: bool,
    /// End of the trial window.
    pub trial_ends_at: Option<DateTime<Utc>>,
    /// When the paid subscription started.
    pub subscription_started_at: Option<DateTime<Utc>>,
    /// When the paid subscription ends.
    pub subscription_ends_at: Option<DateTime<Utc>>,
    /// Internal admin notes.
    pub internal_notes: Option<String>,
    /// Provenance metadata recorded at provisioning time.
    pub metadata: Json<TenantMetadata>,
    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
    /// When the tenant was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    /// Login email.
    pub email: String,
    /// Contact full name.
    pub full_name: String,
    /// Company name.
    pub company: String,
    /// Commercial plan.
    pub plan: Plan,
    /// Monthly request quota.
    pub monthly_quota: i64,
    /// Pre-hashed login password.
    pub password_hash: String,
    /// Pre-hashed cognitive code.
    pub cognitive_code_hash: Option<String>,
    /// End of the trial window.
    pub trial_ends_at: DateTime<Utc>,
    /// When the subscription started.
    pub subscription_started_at: DateTime<Utc>,
    /// Provenance metadata.
    pub metadata: TenantMetadata,
}

/// Admin-editable tenant fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTenant {
    /// New plan.
    pub plan: Option<Plan>,
    /// New status.
    pub status: Option<TenantStatus>,
    /// New monthly quota.
    pub monthly_quota: Option<i64>,
    /// New internal notes (`Some(None)` clears).
    pub internal_notes: Option<Option<String>>,
    /// New trial end (`Some(None)` clears).
    pub trial_ends_at: Option<Option<DateTime<Utc>>>,
    /// New subscription end (`Some(None)` clears).
    pub subscription_ends_at: Option<Option<DateTime<Utc>>>,
}

impl UpdateTenant {
    /// Whether this update would change anything at all.
    pub fn is_empty(&self) -> bool {
        self.plan.is_none()
            && self.status.is_none()
            && self.monthly_quota.is_none()
            && self.internal_notes.is_none()
            && self.trial_ends_at.is_none()
            && self.subscription_ends_at.is_none()
    }
}
