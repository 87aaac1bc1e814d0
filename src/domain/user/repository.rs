//! User repository trait

use async_trait::async_trait;

use super::entity::{NewUser, Program, User, UserId};
use crate::domain::DomainError;

/// Repository for the identity store
///
/// Emails are expected to be lowercased by callers before lookup or insert.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Get a user by ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user; the store assigns the ID.
    /// Fails with `Conflict` if the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Persist the mutable fields of an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Emails of all users in a program except the given user, for teammate
    /// suggestions
    async fn emails_in_program(
        &self,
        program: Program,
        exclude: UserId,
    ) -> Result<Vec<String>, DomainError>;
}
