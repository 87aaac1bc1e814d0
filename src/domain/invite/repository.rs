//! Pending-request repository trait

use async_trait::async_trait;

use super::entity::{PendingRequest, RequestId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for the request store
///
/// The store enforces a unique constraint on the receiver: concurrent
/// inserts for the same receiver surface as `AlreadyInvited` to all but one
/// caller.
#[async_trait]
pub trait RequestRepository: Send + Sync + std::fmt::Debug {
    /// The single pending request naming this receiver, if any
    async fn find_by_receiver(&self, receiver: UserId)
        -> Result<Option<PendingRequest>, DomainError>;

    /// All requests this user has sent and which are still pending
    async fn find_by_sender(&self, sender: UserId) -> Result<Vec<PendingRequest>, DomainError>;

    /// Record a new pending request.
    /// Fails with `AlreadyInvited` if the receiver already has one.
    async fn create(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<PendingRequest, DomainError>;

    /// Delete a request by id. Returns `false` if it was already gone,
    /// which lets concurrent resolutions detect that they lost the race.
    async fn delete(&self, id: RequestId) -> Result<bool, DomainError>;

    /// Purge every outgoing request of a user. Used when that user is
    /// invited by someone else: their own invitations are superseded.
    async fn delete_by_sender(&self, sender: UserId) -> Result<u64, DomainError>;
}
