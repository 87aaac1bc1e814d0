//! Team-invite domain module

pub mod entity;
pub mod repository;

pub use entity::{PendingRequest, RequestId};
pub use repository::RequestRepository;
