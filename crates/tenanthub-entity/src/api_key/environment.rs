//! API key target environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment an API key is scoped to.
///
/// Determines the display prefix of the generated secret, so a leaked
/// value is self-describing even when truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "key_environment", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Live traffic.
    Production,
    /// Pre-production staging.
    Staging,
    /// Local development.
    Development,
}

impl Environment {
    /// Display prefix for secrets minted in this environment.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Self::Production => "th_live",
            Self::Staging | Self::Development => "th_test",
        }
    }

    /// Return the environment as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = tenanthub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(tenanthub_core::AppError::validation(format!(
                "Invalid environment: '{s}'. Expected one of: production, staging, development"
            ))),
        }
    }
}
