//! API key issuance and lifecycle.

pub mod service;

pub use service::{ApiKeyService, IssuedKey};
