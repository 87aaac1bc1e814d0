//! Team repository trait

use async_trait::async_trait;

use super::entity::{MemberSlot, Team, TeamId};
use crate::domain::user::{Program, UserId};
use crate::domain::DomainError;

/// Repository for the team store
///
/// `assign_member_slot` is the only mutation of member slots and must be
/// atomic per team row: a conditional write that succeeds only while the
/// slot is still empty. Teams are never deleted.
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Find the team a user belongs to, in any position.
    /// Each user appears in at most one team row system-wide.
    async fn find_containing(&self, user: UserId) -> Result<Option<Team>, DomainError>;

    /// Create a team with its leader and first member.
    /// Fails with `Conflict` if the leader already has a team row.
    async fn create(
        &self,
        leader: UserId,
        member1: UserId,
        program: Program,
    ) -> Result<Team, DomainError>;

    /// Conditionally occupy a member slot. Returns `false` if the slot was
    /// already taken (the caller lost a race or misread the team state).
    /// Assigning the second slot also marks the team filled.
    async fn assign_member_slot(
        &self,
        team: TeamId,
        slot: MemberSlot,
        member: UserId,
    ) -> Result<bool, DomainError>;
}
