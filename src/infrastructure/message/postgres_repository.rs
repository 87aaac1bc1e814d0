//! PostgreSQL contact-message repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::message::{Message, MessageRepository, NewMessage};
use crate::domain::DomainError;

/// PostgreSQL implementation of MessageRepository
#[derive(Debug, Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, subject, message, created_at
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to store message: {}", e)))?;

        Ok(Message {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            subject: row.get("subject"),
            message: row.get("message"),
            created_at: row.get("created_at"),
        })
    }
}
