//! Tenant administration: viewing, editing, credential resets.

pub mod service;

pub use service::{ResendOutcome, TenantService};
