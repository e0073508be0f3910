//! Commercial plan enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Commercial plan a tenant subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tenant_plan", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Entry paid plan.
    Starter,
    /// Mid-tier plan.
    Pro,
    /// High-volume plan.
    Business,
    /// Custom enterprise plan.
    Enterprise,
}

impl Plan {
    /// Monthly request quota included with this plan.
    pub fn monthly_quota(&self) -> i64 {
        match self {
            Self::Starter => 10_000,
            Self::Pro => 100_000,
            Self::Business => 500_000,
            Self::Enterprise => 1_000_000,
        }
    }

    /// Return the plan as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Pro => "pro",
            Self::Business => "business",
            Self::Enterprise => "enterprise",
        }
    }
}

impl Default for Plan {
    /// The minimum paid plan, used when payment metadata omits the plan.
    fn default() -> Self {
        Self::Starter
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Plan {
    type Err = tenanthub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "starter" => Ok(Self::Starter),
            "pro" => Ok(Self::Pro),
            "business" => Ok(Self::Business),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(tenanthub_core::AppError::validation(format!(
                "Invalid plan: '{s}'. Expected one of: starter, pro, business, enterprise"
            ))),
        }
    }
}
