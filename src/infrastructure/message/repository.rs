//! In-memory contact-message repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::message::{Message, MessageRepository, NewMessage};
use crate::domain::DomainError;

/// In-memory implementation of MessageRepository
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<Vec<Message>>>,
    next_id: AtomicI64,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Stored messages, oldest first. Test helper.
    pub async fn all(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, DomainError> {
        let mut messages = self.messages.write().await;

        let stored = Message {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: message.name,
            email: message.email,
            subject: message.subject,
            message: message.message,
            created_at: Utc::now(),
        };

        messages.push(stored.clone());

        Ok(stored)
    }
}
