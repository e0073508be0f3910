//! Tenant provisioning configuration.

use serde::{Deserialize, Serialize};

/// Settings applied when a paid access request becomes a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Trial duration granted to newly provisioned tenants, in days.
    #[serde(default = "default_trial_days")]
    pub trial_days: i64,
    /// Length of generated temporary passwords.
    #[serde(default = "default_password_length")]
    pub password_length: usize,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            trial_days: default_trial_days(),
            password_length: default_password_length(),
        }
    }
}

fn default_trial_days() -> i64 {
    14
}

fn default_password_length() -> usize {
    16
}
