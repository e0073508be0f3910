//! Payment-confirmed tenant provisioning and webhook dispatch.

pub mod service;

pub use service::ProvisioningService;
