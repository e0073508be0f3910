//! Audit log read side.

pub mod service;

pub use service::AuditService;
