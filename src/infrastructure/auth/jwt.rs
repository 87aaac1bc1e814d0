//! JWT issuance and validation for sessions, account actions and deferred invites

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::config::AuthConfig;
use crate::domain::user::{Program, User, UserId};
use crate::domain::DomainError;

/// Single-use account action a token can authorize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPurpose {
    VerifyAccount,
    ResetPassword,
}

impl ActionPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VerifyAccount => "verify_account",
            Self::ResetPassword => "reset_password",
        }
    }
}

/// Claims carried by a login session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID, stringified)
    pub sub: String,
    /// Login email at issuance time
    pub email: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(user: &User, ttl_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(ttl_hours as i64);

        Self {
            sub: user.id().to_string(),
            email: user.email().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    pub fn user_id(&self) -> Result<UserId, DomainError> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| DomainError::InvalidToken)
    }
}

/// Claims carried by verify-account and reset-password tokens
///
/// The purpose field prevents a verification link from doubling as a
/// password-reset credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionClaims {
    pub email: String,
    pub purpose: ActionPurpose,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by a deferred invite token
///
/// Issued when a leader invites an email that has no account yet. Redeemed
/// during registration; the jti makes every issued token distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeferredInviteClaims {
    /// Inviting leader's user ID, stringified
    pub sender_id: String,
    /// Program the sender's team belongs to
    pub program: Program,
    /// Invited email address
    pub email: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl DeferredInviteClaims {
    pub fn sender_user_id(&self) -> Result<UserId, DomainError> {
        self.sender_id
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| DomainError::InvalidToken)
    }
}

/// Trait for token operations
pub trait TokenService: Send + Sync + Debug {
    /// Issue a session token for a logged-in user
    fn issue_session(&self, user: &User) -> Result<String, DomainError>;

    /// Validate a session token and return its claims
    fn verify_session(&self, token: &str) -> Result<SessionClaims, DomainError>;

    /// Issue a single-purpose account action token for an email address
    fn issue_account_action(
        &self,
        email: &str,
        purpose: ActionPurpose,
    ) -> Result<String, DomainError>;

    /// Validate an account action token, rejecting purpose mismatches
    fn verify_account_action(
        &self,
        token: &str,
        purpose: ActionPurpose,
    ) -> Result<ActionClaims, DomainError>;

    /// Issue a deferred invite token for an unregistered email
    fn issue_deferred_invite(&self, sender: &User, email: &str) -> Result<String, DomainError>;

    /// Validate a deferred invite token and return its claims
    fn verify_deferred_invite(&self, token: &str) -> Result<DeferredInviteClaims, DomainError>;
}

/// HMAC-based token service backed by a shared secret
#[derive(Clone)]
pub struct JwtService {
    session_ttl_hours: u64,
    reset_ttl_minutes: u64,
    deferred_invite_ttl_days: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("reset_ttl_minutes", &self.reset_ttl_minutes)
            .field("deferred_invite_ttl_days", &self.deferred_invite_ttl_days)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            session_ttl_hours: config.session_ttl_hours,
            reset_ttl_minutes: config.reset_ttl_minutes,
            deferred_invite_ttl_days: config.deferred_invite_ttl_days,
            encoding_key,
            decoding_key,
        }
    }

    fn encode<T: Serialize>(&self, claims: &T) -> Result<String, DomainError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }

    fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, DomainError> {
        let validation = Validation::default();

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| DomainError::InvalidToken)
    }
}

impl TokenService for JwtService {
    fn issue_session(&self, user: &User) -> Result<String, DomainError> {
        let claims = SessionClaims::new(user, self.session_ttl_hours);
        self.encode(&claims)
    }

    fn verify_session(&self, token: &str) -> Result<SessionClaims, DomainError> {
        self.decode(token)
    }

    fn issue_account_action(
        &self,
        email: &str,
        purpose: ActionPurpose,
    ) -> Result<String, DomainError> {
        let now = Utc::now();
        // Verification links stay valid as long as a session; reset links are
        // short-lived.
        let exp = match purpose {
            ActionPurpose::VerifyAccount => now + Duration::hours(self.session_ttl_hours as i64),
            ActionPurpose::ResetPassword => now + Duration::minutes(self.reset_ttl_minutes as i64),
        };

        let claims = ActionClaims {
            email: email.to_string(),
            purpose,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        self.encode(&claims)
    }

    fn verify_account_action(
        &self,
        token: &str,
        purpose: ActionPurpose,
    ) -> Result<ActionClaims, DomainError> {
        let claims: ActionClaims = self.decode(token)?;

        if claims.purpose != purpose {
            return Err(DomainError::InvalidToken);
        }

        Ok(claims)
    }

    fn issue_deferred_invite(&self, sender: &User, email: &str) -> Result<String, DomainError> {
        let now = Utc::now();
        let exp = now + Duration::days(self.deferred_invite_ttl_days as i64);

        let claims = DeferredInviteClaims {
            sender_id: sender.id().to_string(),
            program: sender.program(),
            email: email.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        self.encode(&claims)
    }

    fn verify_deferred_invite(&self, token: &str) -> Result<DeferredInviteClaims, DomainError> {
        self.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        let now = Utc::now();
        User::from_parts(
            UserId::new(42),
            "Test User".to_string(),
            "test@example.com".to_string(),
            "hashed_password".to_string(),
            Program::Web,
            "1mv23cs001".to_string(),
            "9876543210".to_string(),
            String::new(),
            true,
            now,
            now,
        )
    }

    fn create_service() -> JwtService {
        JwtService::new(&AuthConfig {
            jwt_secret: "test-secret-key-12345".to_string(),
            session_ttl_hours: 168,
            reset_ttl_minutes: 60,
            deferred_invite_ttl_days: 14,
        })
    }

    #[test]
    fn test_session_round_trip() {
        let service = create_service();
        let user = test_user();

        let token = service.issue_session(&user).unwrap();
        assert!(!token.is_empty());

        let claims = service.verify_session(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), UserId::new(42));
        assert_eq!(claims.email, "test@example.com");
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        let result = service.verify_session("not-a-token");
        assert!(matches!(result, Err(DomainError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = create_service();
        let mut config = AuthConfig::default();
        config.jwt_secret = "a-different-secret".to_string();
        let service2 = JwtService::new(&config);

        let token = service1.issue_session(&test_user()).unwrap();
        assert!(service2.verify_session(&token).is_err());
    }

    #[test]
    fn test_expired_session_rejected() {
        let service = create_service();
        let past = Utc::now() - Duration::hours(2);
        let claims = SessionClaims {
            sub: "42".to_string(),
            email: "test@example.com".to_string(),
            iat: (past - Duration::hours(1)).timestamp(),
            exp: past.timestamp(),
        };

        let token = service.encode(&claims).unwrap();
        assert!(service.verify_session(&token).is_err());
    }

    #[test]
    fn test_action_purpose_mismatch() {
        let service = create_service();

        let token = service
            .issue_account_action("test@example.com", ActionPurpose::VerifyAccount)
            .unwrap();

        assert!(service
            .verify_account_action(&token, ActionPurpose::VerifyAccount)
            .is_ok());
        assert!(matches!(
            service.verify_account_action(&token, ActionPurpose::ResetPassword),
            Err(DomainError::InvalidToken)
        ));
    }

    #[test]
    fn test_deferred_invite_round_trip() {
        let service = create_service();
        let sender = test_user();

        let token = service
            .issue_deferred_invite(&sender, "friend@example.com")
            .unwrap();

        let claims = service.verify_deferred_invite(&token).unwrap();
        assert_eq!(claims.sender_user_id().unwrap(), UserId::new(42));
        assert_eq!(claims.program, Program::Web);
        assert_eq!(claims.email, "friend@example.com");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_deferred_invite_tokens_are_distinct() {
        let service = create_service();
        let sender = test_user();

        let first = service
            .issue_deferred_invite(&sender, "friend@example.com")
            .unwrap();
        let second = service
            .issue_deferred_invite(&sender, "friend@example.com")
            .unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_session_cannot_pass_as_action_token() {
        let service = create_service();
        let token = service.issue_session(&test_user()).unwrap();

        let result = service.verify_account_action(&token, ActionPurpose::VerifyAccount);
        assert!(result.is_err());
    }
}
