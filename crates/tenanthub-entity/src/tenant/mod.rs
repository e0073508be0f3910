//! Tenant entity: a provisioned, billable customer account.

pub mod metadata;
pub mod model;
pub mod plan;
pub mod status;

pub use metadata::TenantMetadata;
pub use model::{CreateTenant, Tenant, UpdateTenant};
pub use plan::Plan;
pub use status::TenantStatus;
