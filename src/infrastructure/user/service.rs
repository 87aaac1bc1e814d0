//! Account service for registration, sessions and profile management

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DomainConfig;
use crate::domain::user::{
    validate_email, validate_mobile, validate_name, validate_password, validate_usn, NewUser,
    Program, User, UserId, UserRepository,
};
use crate::domain::{DomainError, Notifier};
use crate::infrastructure::auth::{ActionPurpose, TokenService};
use crate::infrastructure::mail::templates;

use super::password::PasswordHasher;

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub program: Program,
    pub usn: String,
    pub mobile: String,
    pub about: Option<String>,
}

/// Authenticated profile mutation; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub about: Option<String>,
    pub usn: Option<String>,
}

/// Trait for account operations
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Register a new account and dispatch the verification email
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError>;

    /// Check credentials and issue a session token
    async fn login(&self, email: &str, password: &str) -> Result<(User, String), DomainError>;

    /// Load a user by id
    async fn get_user(&self, id: UserId) -> Result<User, DomainError>;

    /// Mark the account behind a verification token as verified
    async fn verify_account(&self, token: &str) -> Result<User, DomainError>;

    /// Send a password-reset email if the address is registered.
    /// Succeeds either way so callers cannot probe for accounts.
    async fn forgot_password(&self, email: &str) -> Result<(), DomainError>;

    /// Set a new password via a reset token
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<User, DomainError>;

    /// Change the password of a logged-in user
    async fn update_password(
        &self,
        user: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<User, DomainError>;

    /// Apply profile mutations for a logged-in user
    async fn update_profile(&self, user: UserId, update: ProfileUpdate)
        -> Result<User, DomainError>;
}

/// Account service
pub struct AccountService<R: UserRepository, H: PasswordHasher> {
    users: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<dyn TokenService>,
    notifier: Arc<dyn Notifier>,
    domains: DomainConfig,
}

impl<R: UserRepository, H: PasswordHasher> AccountService<R, H> {
    pub fn new(
        users: Arc<R>,
        hasher: Arc<H>,
        tokens: Arc<dyn TokenService>,
        notifier: Arc<dyn Notifier>,
        domains: DomainConfig,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            notifier,
            domains,
        }
    }

    async fn load(&self, id: UserId) -> Result<User, DomainError> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }
}

#[async_trait]
impl<R: UserRepository, H: PasswordHasher> AccountApi for AccountService<R, H> {
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_mobile(&request.mobile).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_usn(&request.usn).map_err(|e| DomainError::validation(e.to_string()))?;

        let email = request.email.trim().to_lowercase();
        validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .users
            .create(NewUser {
                name: request.name,
                email: email.clone(),
                password_hash,
                program: request.program,
                usn: request.usn.to_lowercase(),
                mobile: request.mobile,
                about: request.about.unwrap_or_default(),
            })
            .await?;

        info!(user = %user.id(), program = %user.program(), "User registered");

        let token = self
            .tokens
            .issue_account_action(&email, ActionPurpose::VerifyAccount)?;
        let link = format!("{}/auth/verify-account?token={}", self.domains.backend, token);
        let mail = templates::account_verification(user.name(), user.email(), &link);

        if !self.notifier.send(mail).await {
            warn!(user = %user.id(), "Verification email could not be delivered");
        }

        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<(User, String), DomainError> {
        let email = email.trim().to_lowercase();

        // One error for both unknown email and wrong password
        let invalid = || DomainError::not_authorized("Invalid email or password");

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        if !self.hasher.verify(password, user.password_hash()) {
            return Err(invalid());
        }

        let token = self.tokens.issue_session(&user)?;

        info!(user = %user.id(), "User logged in");

        Ok((user, token))
    }

    async fn get_user(&self, id: UserId) -> Result<User, DomainError> {
        self.load(id).await
    }

    async fn verify_account(&self, token: &str) -> Result<User, DomainError> {
        let claims = self
            .tokens
            .verify_account_action(token, ActionPurpose::VerifyAccount)?;

        let mut user = self
            .users
            .get_by_email(&claims.email)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        user.mark_verified();
        let user = self.users.update(&user).await?;

        info!(user = %user.id(), "Account verified");

        Ok(user)
    }

    async fn forgot_password(&self, email: &str) -> Result<(), DomainError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.users.get_by_email(&email).await? else {
            info!("Password reset requested for an unknown email");
            return Ok(());
        };

        let token = self
            .tokens
            .issue_account_action(&email, ActionPurpose::ResetPassword)?;
        let link = format!("{}/reset-password?token={}", self.domains.frontend, token);
        let mail = templates::password_reset(user.name(), user.email(), &link);

        if !self.notifier.send(mail).await {
            warn!(user = %user.id(), "Password reset email could not be delivered");
        }

        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<User, DomainError> {
        let claims = self
            .tokens
            .verify_account_action(token, ActionPurpose::ResetPassword)?;

        validate_password(new_password).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut user = self
            .users
            .get_by_email(&claims.email)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        user.set_password_hash(self.hasher.hash(new_password)?);
        let user = self.users.update(&user).await?;

        info!(user = %user.id(), "Password reset");

        Ok(user)
    }

    async fn update_password(
        &self,
        user: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<User, DomainError> {
        let mut user = self.load(user).await?;

        if !self.hasher.verify(current_password, user.password_hash()) {
            return Err(DomainError::validation("Current password is incorrect"));
        }

        validate_password(new_password).map_err(|e| DomainError::validation(e.to_string()))?;

        user.set_password_hash(self.hasher.hash(new_password)?);
        self.users.update(&user).await
    }

    async fn update_profile(
        &self,
        user: UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut user = self.load(user).await?;

        if let Some(name) = update.name {
            validate_name(&name).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_name(name);
        }

        if let Some(about) = update.about {
            user.set_about(about);
        }

        if let Some(usn) = update.usn {
            validate_usn(&usn).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_usn(usn.to_lowercase());
        }

        self.users.update(&user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::infrastructure::auth::JwtService;
    use crate::infrastructure::mail::RecordingNotifier;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    struct Fixture {
        service: AccountService<InMemoryUserRepository, Argon2Hasher>,
        notifier: Arc<RecordingNotifier>,
        tokens: Arc<JwtService>,
    }

    fn fixture() -> Fixture {
        let notifier = Arc::new(RecordingNotifier::new());
        let tokens = Arc::new(JwtService::new(&AuthConfig::default()));

        let service = AccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
            tokens.clone(),
            notifier.clone(),
            DomainConfig::default(),
        );

        Fixture {
            service,
            notifier,
            tokens,
        }
    }

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "password1".to_string(),
            program: Program::Web,
            usn: "1MV23CS001".to_string(),
            mobile: "9876543210".to_string(),
            about: None,
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_and_sends_verification() {
        let fix = fixture();

        let user = fix
            .service
            .register(request("Mixed.Case@Example.COM"))
            .await
            .unwrap();

        assert_eq!(user.email(), "mixed.case@example.com");
        assert_eq!(user.usn(), "1mv23cs001");
        assert!(!user.is_verified());

        let sent = fix.notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("/auth/verify-account?token="));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let fix = fixture();

        let mut bad_password = request("a@example.com");
        bad_password.password = "short".to_string();
        assert!(fix.service.register(bad_password).await.is_err());

        let mut bad_usn = request("b@example.com");
        bad_usn.usn = "9XX23CS001".to_string();
        assert!(fix.service.register(bad_usn).await.is_err());

        let mut bad_mobile = request("c@example.com");
        bad_mobile.mobile = "12345".to_string();
        assert!(fix.service.register(bad_mobile).await.is_err());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let fix = fixture();

        fix.service.register(request("a@example.com")).await.unwrap();

        let result = fix.service.register(request("a@example.com")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_fail_registration() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let tokens = Arc::new(JwtService::new(&AuthConfig::default()));
        let service = AccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
            tokens,
            notifier.clone(),
            DomainConfig::default(),
        );

        let user = service.register(request("a@example.com")).await.unwrap();
        assert_eq!(user.email(), "a@example.com");
        assert_eq!(notifier.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let fix = fixture();
        let registered = fix.service.register(request("a@example.com")).await.unwrap();

        let (user, token) = fix
            .service
            .login("A@example.com", "password1")
            .await
            .unwrap();

        assert_eq!(user.id(), registered.id());

        let claims = fix.tokens.verify_session(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), registered.id());
    }

    #[tokio::test]
    async fn test_login_wrong_credentials() {
        let fix = fixture();
        fix.service.register(request("a@example.com")).await.unwrap();

        let wrong_password = fix.service.login("a@example.com", "password2").await;
        assert!(matches!(wrong_password, Err(DomainError::NotAuthorized { .. })));

        let unknown_email = fix.service.login("b@example.com", "password1").await;
        assert!(matches!(unknown_email, Err(DomainError::NotAuthorized { .. })));
    }

    #[tokio::test]
    async fn test_verify_account() {
        let fix = fixture();
        let user = fix.service.register(request("a@example.com")).await.unwrap();

        let token = fix
            .tokens
            .issue_account_action(user.email(), ActionPurpose::VerifyAccount)
            .unwrap();

        let verified = fix.service.verify_account(&token).await.unwrap();
        assert!(verified.is_verified());
    }

    #[tokio::test]
    async fn test_verify_account_rejects_session_token() {
        let fix = fixture();
        let user = fix.service.register(request("a@example.com")).await.unwrap();

        let session = fix.tokens.issue_session(&user).unwrap();

        let result = fix.service.verify_account(&session).await;
        assert!(matches!(result, Err(DomainError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_forgot_password_is_silent_for_unknown_email() {
        let fix = fixture();

        fix.service.forgot_password("nobody@example.com").await.unwrap();
        assert!(fix.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_forgot_and_reset_password() {
        let fix = fixture();
        fix.service.register(request("a@example.com")).await.unwrap();

        fix.service.forgot_password("a@example.com").await.unwrap();

        let sent = fix.notifier.sent().await;
        assert_eq!(sent.len(), 2); // verification + reset
        assert!(sent[1].text.contains("/reset-password?token="));

        let token = fix
            .tokens
            .issue_account_action("a@example.com", ActionPurpose::ResetPassword)
            .unwrap();

        fix.service.reset_password(&token, "newpass99").await.unwrap();

        assert!(fix.service.login("a@example.com", "password1").await.is_err());
        assert!(fix.service.login("a@example.com", "newpass99").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_password_checks_current() {
        let fix = fixture();
        let user = fix.service.register(request("a@example.com")).await.unwrap();

        let wrong = fix
            .service
            .update_password(user.id(), "not-the-password", "newpass99")
            .await;
        assert!(wrong.is_err());

        fix.service
            .update_password(user.id(), "password1", "newpass99")
            .await
            .unwrap();

        assert!(fix.service.login("a@example.com", "newpass99").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let fix = fixture();
        let user = fix.service.register(request("a@example.com")).await.unwrap();

        let updated = fix
            .service
            .update_profile(
                user.id(),
                ProfileUpdate {
                    name: Some("New Name".to_string()),
                    about: Some("likes distributed systems".to_string()),
                    usn: Some("1MV23CS042".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name(), "New Name");
        assert_eq!(updated.about(), "likes distributed systems");
        assert_eq!(updated.usn(), "1mv23cs042");

        let invalid = fix
            .service
            .update_profile(
                user.id(),
                ProfileUpdate {
                    name: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(invalid, Err(DomainError::Validation { .. })));
    }
}
