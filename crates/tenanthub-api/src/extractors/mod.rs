//! Request extractors.

pub mod admin;
pub mod pagination;

pub use admin::AdminContext;
pub use pagination::PaginationParams;
