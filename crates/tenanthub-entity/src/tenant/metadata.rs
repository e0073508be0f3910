//! Provenance metadata carried on a tenant.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access_request::{EstimatedVolume, UseCase};

/// Closed provenance schema recorded at provisioning time.
///
/// Modeled as a fixed struct rather than an open map so the provisioning
/// invariants (originating request, payment correlation) stay checkable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantMetadata {
    /// The access request this tenant was provisioned from.
    pub access_request_id: Uuid,
    /// Checkout session id at the payment processor.
    pub payment_session_id: Option<String>,
    /// Customer id at the payment processor.
    pub payment_customer_id: Option<String>,
    /// Subscription id at the payment processor.
    pub payment_subscription_id: Option<String>,
    /// Use case copied from the access request.
    pub use_case: UseCase,
    /// Volume bucket copied from the access request.
    pub estimated_volume: EstimatedVolume,
    /// How this tenant was created (e.g. `"payment_webhook"`).
    pub source: String,
}
