//! In-memory pending-request repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::invite::{PendingRequest, RequestId, RequestRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of RequestRepository
///
/// The receiver uniqueness check runs under the write lock, matching the
/// unique index on `requests.receiver_id` in Postgres.
#[derive(Debug)]
pub struct InMemoryRequestRepository {
    requests: Arc<RwLock<HashMap<i64, PendingRequest>>>,
    next_id: AtomicI64,
}

impl InMemoryRequestRepository {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryRequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn find_by_receiver(
        &self,
        receiver: UserId,
    ) -> Result<Option<PendingRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .find(|r| r.receiver_id() == receiver)
            .cloned())
    }

    async fn find_by_sender(&self, sender: UserId) -> Result<Vec<PendingRequest>, DomainError> {
        let requests = self.requests.read().await;

        let mut sent: Vec<PendingRequest> = requests
            .values()
            .filter(|r| r.sender_id() == sender)
            .cloned()
            .collect();

        sent.sort_by_key(|r| r.id().as_i64());

        Ok(sent)
    }

    async fn create(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<PendingRequest, DomainError> {
        let mut requests = self.requests.write().await;

        if requests.values().any(|r| r.receiver_id() == receiver) {
            return Err(DomainError::AlreadyInvited);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = PendingRequest::from_parts(RequestId::new(id), sender, receiver, Utc::now());

        requests.insert(id, request.clone());

        Ok(request)
    }

    async fn delete(&self, id: RequestId) -> Result<bool, DomainError> {
        let mut requests = self.requests.write().await;
        Ok(requests.remove(&id.as_i64()).is_some())
    }

    async fn delete_by_sender(&self, sender: UserId) -> Result<u64, DomainError> {
        let mut requests = self.requests.write().await;

        let before = requests.len();
        requests.retain(|_, r| r.sender_id() != sender);

        Ok((before - requests.len()) as u64)
    }
}
