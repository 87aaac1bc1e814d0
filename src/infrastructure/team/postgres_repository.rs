//! PostgreSQL team repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::team::{MemberSlot, Team, TeamId, TeamRepository};
use crate::domain::user::{Program, UserId};
use crate::domain::DomainError;

/// PostgreSQL implementation of TeamRepository
///
/// Slot writes are conditional UPDATEs guarded by `IS NULL`, so two
/// concurrent accepts for the same slot resolve to exactly one winner
/// without explicit row locks.
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TEAM_COLUMNS: &str = "id, program, leader_id, member1_id, member2_id, filled, created_at";

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn find_containing(&self, user: UserId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM teams
            WHERE leader_id = $1 OR member1_id = $1 OR member2_id = $1
            "#,
            TEAM_COLUMNS
        ))
        .bind(user.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find team: {}", e)))?;

        row.map(|r| row_to_team(&r)).transpose()
    }

    async fn create(
        &self,
        leader: UserId,
        member1: UserId,
        program: Program,
    ) -> Result<Team, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO teams (program, leader_id, member1_id)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            TEAM_COLUMNS
        ))
        .bind(program.as_str())
        .bind(leader.as_i64())
        .bind(member1.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("User '{}' already leads a team", leader))
            } else {
                DomainError::storage(format!("Failed to create team: {}", e))
            }
        })?;

        row_to_team(&row)
    }

    async fn assign_member_slot(
        &self,
        team: TeamId,
        slot: MemberSlot,
        member: UserId,
    ) -> Result<bool, DomainError> {
        let query = match slot {
            MemberSlot::First => {
                r#"
                UPDATE teams
                SET member1_id = $2
                WHERE id = $1 AND member1_id IS NULL
                "#
            }
            MemberSlot::Second => {
                r#"
                UPDATE teams
                SET member2_id = $2, filled = TRUE
                WHERE id = $1 AND member2_id IS NULL
                "#
            }
        };

        let result = sqlx::query(query)
            .bind(team.as_i64())
            .bind(member.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to assign member slot: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Result<Team, DomainError> {
    let program: String = row.get("program");
    let program = Program::parse(&program)
        .map_err(|e| DomainError::storage(format!("Invalid program in database: {}", e)))?;

    let member1_id: Option<i64> = row.get("member1_id");
    let member2_id: Option<i64> = row.get("member2_id");

    Ok(Team::from_parts(
        TeamId::new(row.get("id")),
        program,
        UserId::new(row.get("leader_id")),
        member1_id.map(UserId::new),
        member2_id.map(UserId::new),
        row.get("filled"),
        row.get("created_at"),
    ))
}
