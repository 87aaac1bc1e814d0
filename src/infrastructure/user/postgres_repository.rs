//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, Program, User, UserId, UserRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, program, usn, mobile, about, verified, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, program, usn, mobile, about)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.program.as_str())
        .bind(&user.usn)
        .bind(&user.mobile)
        .bind(&user.about)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Email '{}' is already registered", user.email))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        row_to_user(&row)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, password_hash = $3, usn = $4, mobile = $5, about = $6,
                verified = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_i64())
        .bind(user.name())
        .bind(user.password_hash())
        .bind(user.usn())
        .bind(user.mobile())
        .bind(user.about())
        .bind(user.is_verified())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn emails_in_program(
        &self,
        program: Program,
        exclude: UserId,
    ) -> Result<Vec<String>, DomainError> {
        let emails: Vec<String> = sqlx::query_scalar(
            "SELECT email FROM users WHERE program = $1 AND id <> $2 ORDER BY email",
        )
        .bind(program.as_str())
        .bind(exclude.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list program emails: {}", e)))?;

        Ok(emails)
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let program: String = row.get("program");
    let program = Program::parse(&program)
        .map_err(|e| DomainError::storage(format!("Invalid program in database: {}", e)))?;

    Ok(User::from_parts(
        UserId::new(row.get("id")),
        row.get("name"),
        row.get("email"),
        row.get("password_hash"),
        program,
        row.get("usn"),
        row.get("mobile"),
        row.get("about"),
        row.get("verified"),
        row.get("created_at"),
        row.get("updated_at"),
    ))
}
