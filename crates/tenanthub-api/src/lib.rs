//! # tenanthub-api
//!
//! HTTP API layer for TenantHub built on Axum.
//!
//! Provides the admin REST endpoints, the public submission endpoint,
//! the payment webhook, middleware, extractors, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
