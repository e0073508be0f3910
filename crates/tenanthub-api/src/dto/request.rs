//! Request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use tenanthub_entity::api_key::Environment;
use tenanthub_entity::tenant::model::UpdateTenant;
use tenanthub_entity::tenant::{Plan, TenantStatus};

/// Body for approving an access request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveBody {
    /// Plan to offer at checkout; defaults to the minimum paid plan.
    #[serde(default)]
    pub plan: Plan,
    /// Internal notes to record on the request.
    pub notes: Option<String>,
}

/// Body for rejecting an access request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectBody {
    /// Reason recorded and optionally sent to the prospect.
    pub reason: String,
    /// Internal notes to record on the request.
    pub notes: Option<String>,
    /// Whether to email the prospect about the decision.
    #[serde(default = "default_true")]
    pub send_email: bool,
}

fn default_true() -> bool {
    true
}

/// Body for admin tenant edits.
///
/// Distinguishes "absent" (leave unchanged) from "null" (clear) on the
/// nullable fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTenantBody {
    /// New plan.
    pub plan: Option<Plan>,
    /// New status.
    pub status: Option<TenantStatus>,
    /// New monthly quota.
    pub monthly_quota: Option<i64>,
    /// New internal notes; explicit null clears.
    #[serde(default, deserialize_with = "double_option")]
    pub internal_notes: Option<Option<String>>,
    /// New trial end; explicit null clears.
    #[serde(default, deserialize_with = "double_option")]
    pub trial_ends_at: Option<Option<DateTime<Utc>>>,
    /// New subscription end; explicit null clears.
    #[serde(default, deserialize_with = "double_option")]
    pub subscription_ends_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateTenantBody> for UpdateTenant {
    fn from(body: UpdateTenantBody) -> Self {
        Self {
            plan: body.plan,
            status: body.status,
            monthly_quota: body.monthly_quota,
            internal_notes: body.internal_notes,
            trial_ends_at: body.trial_ends_at,
            subscription_ends_at: body.subscription_ends_at,
        }
    }
}

/// Deserialize a present-but-possibly-null field into `Some(inner)`,
/// leaving `None` for absent fields via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Body for creating an API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApiKeyBody {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Target environment.
    pub environment: Environment,
    /// Human-readable label.
    pub name: Option<String>,
}

/// Body for toggling an API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleApiKeyBody {
    /// Desired active state.
    pub is_active: bool,
}
