//! # tenanthub-service
//!
//! Business logic service layer for TenantHub. Each service orchestrates
//! repositories, the credential generator, the payment gateway, and the
//! notifier to implement application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod access_request;
pub mod api_key;
pub mod audit;
pub mod context;
pub mod provisioning;
pub mod tenant;

pub use access_request::AccessRequestService;
pub use api_key::ApiKeyService;
pub use audit::AuditService;
pub use context::RequestContext;
pub use provisioning::ProvisioningService;
pub use tenant::TenantService;
