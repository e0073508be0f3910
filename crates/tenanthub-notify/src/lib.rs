//! # tenanthub-notify
//!
//! Transactional email: delivery client and message templates.

pub mod client;
pub mod templates;

pub use client::{HttpNotifier, Notifier};
