//! # tenanthub-entity
//!
//! Domain entity models for TenantHub: access requests, tenants, API keys,
//! and audit records, together with their enumerations.

pub mod access_request;
pub mod api_key;
pub mod audit;
pub mod tenant;
