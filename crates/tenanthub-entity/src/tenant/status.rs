//! Tenant account status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a tenant account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tenant_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    /// In the free trial window following provisioning.
    Trial,
    /// Active paying customer.
    Active,
    /// Suspended by an admin.
    Suspended,
    /// Subscription cancelled at the payment processor.
    Cancelled,
    /// Left after subscription lapsed.
    Churned,
}

impl TenantStatus {
    /// Whether the tenant may currently call the platform API.
    pub fn is_serviceable(&self) -> bool {
        matches!(self, Self::Trial | Self::Active)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Cancelled => "cancelled",
            Self::Churned => "churned",
        }
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TenantStatus {
    type Err = tenanthub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trial" => Ok(Self::Trial),
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "cancelled" => Ok(Self::Cancelled),
            "churned" => Ok(Self::Churned),
            _ => Err(tenanthub_core::AppError::validation(format!(
                "Invalid tenant status: '{s}'. Expected one of: trial, active, suspended, cancelled, churned"
            ))),
        }
    }
}
