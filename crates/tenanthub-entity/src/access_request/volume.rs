//! Estimated request volume buckets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bucketed monthly volume estimate declared on an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "estimated_volume", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstimatedVolume {
    /// Under 10k requests/month.
    Low,
    /// 10k – 100k requests/month.
    Medium,
    /// 100k – 1M requests/month.
    High,
    /// Over 1M requests/month.
    VeryHigh,
}

impl EstimatedVolume {
    /// Return the bucket as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for EstimatedVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EstimatedVolume {
    type Err = tenanthub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "very_high" => Ok(Self::VeryHigh),
            _ => Err(tenanthub_core::AppError::validation(format!(
                "Invalid volume bucket: '{s}'. Expected one of: low, medium, high, very_high"
            ))),
        }
    }
}
