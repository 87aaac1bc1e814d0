//! In-memory team repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::team::{MemberSlot, Team, TeamId, TeamRepository};
use crate::domain::user::{Program, UserId};
use crate::domain::DomainError;

/// In-memory implementation of TeamRepository
///
/// Slot assignment takes the write lock for check-and-set, which gives the
/// same winner-takes-the-slot behavior as the conditional UPDATE in the
/// Postgres implementation.
#[derive(Debug)]
pub struct InMemoryTeamRepository {
    teams: Arc<RwLock<HashMap<i64, Team>>>,
    next_id: AtomicI64,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self {
            teams: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryTeamRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn find_containing(&self, user: UserId) -> Result<Option<Team>, DomainError> {
        let teams = self.teams.read().await;
        Ok(teams.values().find(|t| t.contains(user)).cloned())
    }

    async fn create(
        &self,
        leader: UserId,
        member1: UserId,
        program: Program,
    ) -> Result<Team, DomainError> {
        let mut teams = self.teams.write().await;

        if teams.values().any(|t| t.leader_id() == leader) {
            return Err(DomainError::conflict(format!(
                "User '{}' already leads a team",
                leader
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let team = Team::from_parts(
            TeamId::new(id),
            program,
            leader,
            Some(member1),
            None,
            false,
            Utc::now(),
        );

        teams.insert(id, team.clone());

        Ok(team)
    }

    async fn assign_member_slot(
        &self,
        team: TeamId,
        slot: MemberSlot,
        member: UserId,
    ) -> Result<bool, DomainError> {
        let mut teams = self.teams.write().await;

        let current = teams
            .get(&team.as_i64())
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team)))?
            .clone();

        let (member1, member2) = match slot {
            MemberSlot::First => {
                if current.member1_id().is_some() {
                    return Ok(false);
                }
                (Some(member), current.member2_id())
            }
            MemberSlot::Second => {
                if current.member2_id().is_some() {
                    return Ok(false);
                }
                (current.member1_id(), Some(member))
            }
        };

        let updated = Team::from_parts(
            current.id(),
            current.program(),
            current.leader_id(),
            member1,
            member2,
            member1.is_some() && member2.is_some(),
            current.created_at(),
        );

        teams.insert(team.as_i64(), updated);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryTeamRepository::new();

        let team = repo
            .create(UserId::new(1), UserId::new(2), Program::Web)
            .await
            .unwrap();

        assert_eq!(team.leader_id(), UserId::new(1));
        assert_eq!(team.member1_id(), Some(UserId::new(2)));
        assert!(!team.is_filled());

        let by_leader = repo.find_containing(UserId::new(1)).await.unwrap();
        assert_eq!(by_leader.unwrap().id(), team.id());

        let by_member = repo.find_containing(UserId::new(2)).await.unwrap();
        assert_eq!(by_member.unwrap().id(), team.id());

        let none = repo.find_containing(UserId::new(99)).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_leader() {
        let repo = InMemoryTeamRepository::new();

        repo.create(UserId::new(1), UserId::new(2), Program::Web)
            .await
            .unwrap();

        let result = repo.create(UserId::new(1), UserId::new(3), Program::Web).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_assign_second_slot_fills_team() {
        let repo = InMemoryTeamRepository::new();
        let team = repo
            .create(UserId::new(1), UserId::new(2), Program::Web)
            .await
            .unwrap();

        let assigned = repo
            .assign_member_slot(team.id(), MemberSlot::Second, UserId::new(3))
            .await
            .unwrap();
        assert!(assigned);

        let reloaded = repo.find_containing(UserId::new(3)).await.unwrap().unwrap();
        assert_eq!(reloaded.member2_id(), Some(UserId::new(3)));
        assert!(reloaded.is_filled());
    }

    #[tokio::test]
    async fn test_assign_taken_slot_is_rejected() {
        let repo = InMemoryTeamRepository::new();
        let team = repo
            .create(UserId::new(1), UserId::new(2), Program::Web)
            .await
            .unwrap();

        let assigned = repo
            .assign_member_slot(team.id(), MemberSlot::First, UserId::new(3))
            .await
            .unwrap();
        assert!(!assigned);

        // Loser's write must not clobber the original occupant
        let reloaded = repo.find_containing(UserId::new(2)).await.unwrap().unwrap();
        assert_eq!(reloaded.member1_id(), Some(UserId::new(2)));
    }

    #[tokio::test]
    async fn test_assign_missing_team() {
        let repo = InMemoryTeamRepository::new();

        let result = repo
            .assign_member_slot(TeamId::new(404), MemberSlot::First, UserId::new(1))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
