//! Concrete repository implementations backed by PostgreSQL.

pub mod access_request;
pub mod api_key;
pub mod audit;
pub mod tenant;

pub use access_request::AccessRequestRepository;
pub use api_key::ApiKeyRepository;
pub use audit::AuditRepository;
pub use tenant::TenantRepository;
