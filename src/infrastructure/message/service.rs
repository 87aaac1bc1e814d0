//! Contact-form message intake

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::domain::message::{Message, MessageRepository, NewMessage};
use crate::domain::user::validate_email;
use crate::domain::DomainError;

/// Trait for contact-message operations
#[async_trait]
pub trait MessageApi: Send + Sync {
    /// Validate and store a contact-form submission
    async fn submit(&self, message: NewMessage) -> Result<Message, DomainError>;
}

/// Message service
pub struct MessageService<R: MessageRepository> {
    messages: Arc<R>,
}

impl<R: MessageRepository> MessageService<R> {
    pub fn new(messages: Arc<R>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl<R: MessageRepository> MessageApi for MessageService<R> {
    async fn submit(&self, message: NewMessage) -> Result<Message, DomainError> {
        if message.name.trim().is_empty() {
            return Err(DomainError::validation("Name is required"));
        }

        validate_email(&message.email).map_err(|e| DomainError::validation(e.to_string()))?;

        if message.subject.trim().is_empty() || message.message.trim().is_empty() {
            return Err(DomainError::validation("Subject and message are required"));
        }

        let stored = self.messages.create(message).await?;

        info!(message = stored.id, from = %stored.email, "Contact message stored");

        Ok(stored)
    }
}
