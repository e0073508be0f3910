//! Declared use case of an access request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The prospect's declared use case for the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "use_case", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UseCase {
    /// Banking and financial services.
    Banking,
    /// E-commerce platforms.
    Ecommerce,
    /// Direct API integration.
    Api,
    /// Anything else.
    Other,
}

impl UseCase {
    /// Return the use case as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Banking => "banking",
            Self::Ecommerce => "ecommerce",
            Self::Api => "api",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UseCase {
    type Err = tenanthub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "banking" => Ok(Self::Banking),
            "ecommerce" => Ok(Self::Ecommerce),
            "api" => Ok(Self::Api),
            "other" => Ok(Self::Other),
            _ => Err(tenanthub_core::AppError::validation(format!(
                "Invalid use case: '{s}'. Expected one of: banking, ecommerce, api, other"
            ))),
        }
    }
}
