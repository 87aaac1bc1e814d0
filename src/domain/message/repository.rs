//! Contact-message repository trait

use async_trait::async_trait;

use super::entity::{Message, NewMessage};
use crate::domain::DomainError;

/// Repository for stored contact-form messages
#[async_trait]
pub trait MessageRepository: Send + Sync + std::fmt::Debug {
    /// Store a new message
    async fn create(&self, message: NewMessage) -> Result<Message, DomainError>;
}
