//! Contact-message persistence and intake

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresMessageRepository;
pub use repository::InMemoryMessageRepository;
pub use service::{MessageApi, MessageService};
