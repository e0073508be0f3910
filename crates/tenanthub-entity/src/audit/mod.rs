//! Audit record entity: immutable proof of administrative mutations.

pub mod model;

pub use model::{AuditRecord, CreateAuditRecord, actions};
