//! Pending-request persistence

pub mod postgres_repository;
pub mod repository;

pub use postgres_repository::PostgresRequestRepository;
pub use repository::InMemoryRequestRepository;
