//! Route handlers organized by domain.

pub mod access_requests;
pub mod api_keys;
pub mod audit;
pub mod health;
pub mod tenants;
pub mod webhooks;
