//! PostgreSQL pending-request repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::invite::{PendingRequest, RequestId, RequestRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of RequestRepository
#[derive(Debug, Clone)]
pub struct PostgresRequestRepository {
    pool: PgPool,
}

impl PostgresRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestRepository for PostgresRequestRepository {
    async fn find_by_receiver(
        &self,
        receiver: UserId,
    ) -> Result<Option<PendingRequest>, DomainError> {
        let row = sqlx::query(
            "SELECT id, sender_id, receiver_id, created_at FROM requests WHERE receiver_id = $1",
        )
        .bind(receiver.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find request: {}", e)))?;

        Ok(row.map(|r| row_to_request(&r)))
    }

    async fn find_by_sender(&self, sender: UserId) -> Result<Vec<PendingRequest>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, created_at
            FROM requests
            WHERE sender_id = $1
            ORDER BY id
            "#,
        )
        .bind(sender.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list sent requests: {}", e)))?;

        Ok(rows.iter().map(row_to_request).collect())
    }

    async fn create(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<PendingRequest, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO requests (sender_id, receiver_id)
            VALUES ($1, $2)
            RETURNING id, sender_id, receiver_id, created_at
            "#,
        )
        .bind(sender.as_i64())
        .bind(receiver.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::AlreadyInvited
            } else {
                DomainError::storage(format!("Failed to create request: {}", e))
            }
        })?;

        Ok(row_to_request(&row))
    }

    async fn delete(&self, id: RequestId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete request: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_sender(&self, sender: UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM requests WHERE sender_id = $1")
            .bind(sender.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to purge sent requests: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn row_to_request(row: &sqlx::postgres::PgRow) -> PendingRequest {
    PendingRequest::from_parts(
        RequestId::new(row.get("id")),
        UserId::new(row.get("sender_id")),
        UserId::new(row.get("receiver_id")),
        row.get("created_at"),
    )
}
