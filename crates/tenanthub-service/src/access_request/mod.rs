//! Access request lifecycle: submission, review, approval, rejection.

pub mod service;

pub use service::{AccessRequestService, ApproveOutcome, RequestStatsView, SubmitRequest};
