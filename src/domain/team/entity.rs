//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::{Program, UserId};

/// Team identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(i64);

impl TeamId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two non-leader membership positions in a team.
/// Slot ordering matters only for display; `First` is always populated
/// before `Second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberSlot {
    First,
    Second,
}

/// Role of a user within a team, derived from which column holds their id -
/// never stored redundantly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Leader,
    Member,
}

/// Team of up to three: an immutable leader plus two ordered member slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    id: TeamId,
    /// Program shared by every member
    program: Program,
    /// Set at creation, immutable afterwards
    leader_id: UserId,
    /// First member slot; populated before the second
    member1_id: Option<UserId>,
    /// Second member slot
    member2_id: Option<UserId>,
    /// True iff both member slots are occupied
    filled: bool,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl Team {
    /// Restore a team from persisted state
    pub fn from_parts(
        id: TeamId,
        program: Program,
        leader_id: UserId,
        member1_id: Option<UserId>,
        member2_id: Option<UserId>,
        filled: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            program,
            leader_id,
            member1_id,
            member2_id,
            filled,
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn program(&self) -> Program {
        self.program
    }

    pub fn leader_id(&self) -> UserId {
        self.leader_id
    }

    pub fn member1_id(&self) -> Option<UserId> {
        self.member1_id
    }

    pub fn member2_id(&self) -> Option<UserId> {
        self.member2_id
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Derived properties

    /// True if the user appears in any of the three positions
    pub fn contains(&self, user: UserId) -> bool {
        self.leader_id == user
            || self.member1_id == Some(user)
            || self.member2_id == Some(user)
    }

    pub fn is_leader(&self, user: UserId) -> bool {
        self.leader_id == user
    }

    /// Role of a user in this team, if they belong to it
    pub fn role_of(&self, user: UserId) -> Option<TeamRole> {
        if self.is_leader(user) {
            Some(TeamRole::Leader)
        } else if self.member1_id == Some(user) || self.member2_id == Some(user) {
            Some(TeamRole::Member)
        } else {
            None
        }
    }

    /// The next member slot to populate, if any
    pub fn open_slot(&self) -> Option<MemberSlot> {
        if self.member1_id.is_none() {
            Some(MemberSlot::First)
        } else if self.member2_id.is_none() {
            Some(MemberSlot::Second)
        } else {
            None
        }
    }

    /// Number of occupied member slots (excludes the leader)
    pub fn member_count(&self) -> usize {
        self.member1_id.iter().count() + self.member2_id.iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(member1: Option<i64>, member2: Option<i64>) -> Team {
        Team::from_parts(
            TeamId::new(1),
            Program::Web,
            UserId::new(10),
            member1.map(UserId::new),
            member2.map(UserId::new),
            member1.is_some() && member2.is_some(),
            Utc::now(),
        )
    }

    #[test]
    fn test_contains_and_roles() {
        let team = team(Some(11), None);

        assert!(team.contains(UserId::new(10)));
        assert!(team.contains(UserId::new(11)));
        assert!(!team.contains(UserId::new(12)));

        assert_eq!(team.role_of(UserId::new(10)), Some(TeamRole::Leader));
        assert_eq!(team.role_of(UserId::new(11)), Some(TeamRole::Member));
        assert_eq!(team.role_of(UserId::new(12)), None);
    }

    #[test]
    fn test_open_slot_ordering() {
        assert_eq!(team(None, None).open_slot(), Some(MemberSlot::First));
        assert_eq!(team(Some(11), None).open_slot(), Some(MemberSlot::Second));
        assert_eq!(team(Some(11), Some(12)).open_slot(), None);
    }

    #[test]
    fn test_filled_iff_both_slots() {
        assert!(!team(None, None).is_filled());
        assert!(!team(Some(11), None).is_filled());
        assert!(team(Some(11), Some(12)).is_filled());
    }

    #[test]
    fn test_member_count() {
        assert_eq!(team(None, None).member_count(), 0);
        assert_eq!(team(Some(11), None).member_count(), 1);
        assert_eq!(team(Some(11), Some(12)).member_count(), 2);
    }
}
