//! API key entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::environment::Environment;

/// A hashed API key owned by exactly one tenant.
///
/// The full secret is shown to the admin exactly once at creation; only
/// the hash, the display prefix, and the last four characters persist.
/// Revoking flips `is_active` and never deletes the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiKey {
    /// Unique key identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Argon2id hash of the full secret.
    #[serde(skip_serializing)]
    pub key_hash: String,
    /// Display prefix (e.g. `"th_live"`).
    pub key_prefix: String,
    /// Last four characters of the full secret.
    pub last_four: String,
    /// Human-readable label.
    pub name: Option<String>,
    /// Target environment.
    pub environment: Environment,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Whether the key is currently usable.
    pub is_active: bool,
    /// When the key was created.
    pub created_at: DateTime<Utc>,
    /// When the key was last used for authentication.
    pub last_used_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// Masked display form, e.g. `"th_live_…abcd"`.
    pub fn masked(&self) -> String {
        format!("{}_…{}", self.key_prefix, self.last_four)
    }
}

/// Data required to create a new API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApiKey {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Pre-hashed secret.
    pub key_hash: String,
    /// Display prefix.
    pub key_prefix: String,
    /// Last four characters of the secret.
    pub last_four: String,
    /// Human-readable label.
    pub name: Option<String>,
    /// Target environment.
    pub environment: Environment,
    /// Granted scopes.
    pub scopes: Vec<String>,
}

/// Default scopes granted to a newly issued key.
pub fn default_scopes() -> Vec<String> {
    vec!["verify".to_string(), "generate".to_string()]
}
