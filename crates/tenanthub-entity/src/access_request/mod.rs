//! Access request entity: a prospect's application for platform access.

pub mod model;
pub mod status;
pub mod use_case;
pub mod volume;

pub use model::{AccessRequest, CreateAccessRequest};
pub use status::RequestStatus;
pub use use_case::UseCase;
pub use volume::EstimatedVolume;
