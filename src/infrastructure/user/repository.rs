//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, Program, User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
///
/// Assigns sequential IDs the way the database would. Used in tests and as
/// a reference for the constraint behavior the Postgres schema enforces.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    /// Index for email -> user ID lookup
    email_index: Arc<RwLock<HashMap<String, i64>>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id.as_i64()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email_index = self.email_index.read().await;

        if let Some(user_id) = email_index.get(email) {
            let users = self.users.read().await;
            return Ok(users.get(user_id).cloned());
        }

        Ok(None)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        if email_index.contains_key(&new_user.email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                new_user.email
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let user = User::from_parts(
            UserId::new(id),
            new_user.name,
            new_user.email.clone(),
            new_user.password_hash,
            new_user.program,
            new_user.usn,
            new_user.mobile,
            new_user.about,
            false,
            now,
            now,
        );

        email_index.insert(new_user.email, id);
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        let id = user.id().as_i64();

        if !users.contains_key(&id) {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        users.insert(id, user.clone());

        Ok(user.clone())
    }

    async fn emails_in_program(
        &self,
        program: Program,
        exclude: UserId,
    ) -> Result<Vec<String>, DomainError> {
        let users = self.users.read().await;

        let mut emails: Vec<String> = users
            .values()
            .filter(|u| u.program() == program && u.id() != exclude)
            .map(|u| u.email().to_string())
            .collect();

        emails.sort();

        Ok(emails)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, program: Program) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "hashed_password".to_string(),
            program,
            usn: "1mv23cs001".to_string(),
            mobile: "9876543210".to_string(),
            about: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(new_user("a@example.com", Program::Web)).await.unwrap();
        let second = repo.create(new_user("b@example.com", Program::Web)).await.unwrap();

        assert_ne!(first.id(), second.id());
        assert!(!first.is_verified());
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("a@example.com", Program::Web)).await.unwrap();

        let found = repo.get_by_email("a@example.com").await.unwrap();
        assert_eq!(found.unwrap().id(), created.id());

        let missing = repo.get_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@example.com", Program::Web)).await.unwrap();

        let result = repo.create(new_user("a@example.com", Program::App)).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.create(new_user("a@example.com", Program::Web)).await.unwrap();

        user.set_about("ships compilers");
        repo.update(&user).await.unwrap();

        let reloaded = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(reloaded.about(), "ships compilers");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("a@example.com", Program::Web)).await.unwrap();

        let phantom = User::from_parts(
            UserId::new(user.id().as_i64() + 100),
            "Ghost".to_string(),
            "ghost@example.com".to_string(),
            "hash".to_string(),
            Program::Web,
            "1mv23cs002".to_string(),
            "9876543211".to_string(),
            String::new(),
            false,
            Utc::now(),
            Utc::now(),
        );

        let result = repo.update(&phantom).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_emails_in_program_excludes_requester() {
        let repo = InMemoryUserRepository::new();
        let me = repo.create(new_user("me@example.com", Program::Web)).await.unwrap();
        repo.create(new_user("peer@example.com", Program::Web)).await.unwrap();
        repo.create(new_user("other@example.com", Program::Dsa)).await.unwrap();

        let emails = repo.emails_in_program(Program::Web, me.id()).await.unwrap();
        assert_eq!(emails, vec!["peer@example.com".to_string()]);
    }
}
