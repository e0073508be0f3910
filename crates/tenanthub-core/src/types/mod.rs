//! Shared type utilities.

pub mod pagination;
