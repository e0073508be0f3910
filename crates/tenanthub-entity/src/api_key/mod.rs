//! API key entity: a hashed credential owned by exactly one tenant.

pub mod environment;
pub mod model;

pub use environment::Environment;
pub use model::{ApiKey, CreateApiKey, default_scopes};
