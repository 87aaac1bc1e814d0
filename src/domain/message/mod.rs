//! Contact-message domain module

pub mod entity;
pub mod repository;

pub use entity::{Message, NewMessage};
pub use repository::MessageRepository;
