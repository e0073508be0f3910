//! Request context carrying the acting admin identity and provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current administrative request.
///
/// Extracted from trusted headers by the API layer and passed into
/// service methods so that every mutation knows *who* is acting and
/// from *where*; the values flow straight into audit records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting admin's ID.
    pub admin_id: Uuid,
    /// The acting admin's email, used as the audit actor label.
    pub admin_email: String,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        admin_id: Uuid,
        admin_email: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            admin_id,
            admin_email,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Context for actions taken by the payment webhook rather than a
    /// human admin. Uses the nil UUID as the actor id.
    pub fn system_webhook() -> Self {
        Self {
            admin_id: Uuid::nil(),
            admin_email: "payment-webhook".to_string(),
            ip_address: None,
            user_agent: None,
            request_time: Utc::now(),
        }
    }
}
