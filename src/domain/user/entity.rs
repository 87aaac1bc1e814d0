//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// User identifier - database-assigned, never zero for a persisted user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Program cohort a user registers for; teammates must share a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Program {
    Web,
    App,
    Dsa,
}

impl Program {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::App => "app",
            Self::Dsa => "dsa",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "web" => Ok(Self::Web),
            "app" => Ok(Self::App),
            "dsa" => Ok(Self::Dsa),
            other => Err(DomainError::validation(format!(
                "Invalid program '{}'. Expected one of: web, app, dsa",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Program {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Data for a user that has not been persisted yet; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub program: Program,
    pub usn: String,
    pub mobile: String,
    pub about: String,
}

/// Registered user
///
/// Team membership is never stored here - it is derived by scanning team
/// rows, so it cannot drift out of sync with the teams table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    id: UserId,
    /// Display name
    name: String,
    /// Login identity, unique, stored lowercased
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    /// Program cohort
    program: Program,
    /// University serial number
    usn: String,
    /// Mobile number
    mobile: String,
    /// Free-form profile text
    about: String,
    /// Whether the email address has been verified
    verified: bool,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl User {
    /// Restore a user from persisted state
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        name: String,
        email: String,
        password_hash: String,
        program: Program,
        usn: String,
        mobile: String,
        about: String,
        verified: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            program,
            usn,
            mobile,
            about,
            verified,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn program(&self) -> Program {
        self.program
    }

    pub fn usn(&self) -> &str {
        &self.usn
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_about(&mut self, about: impl Into<String>) {
        self.about = about.into();
        self.touch();
    }

    pub fn set_usn(&mut self, usn: impl Into<String>) {
        self.usn = usn.into();
        self.touch();
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    pub fn mark_verified(&mut self) {
        if !self.verified {
            self.verified = true;
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(id: i64, email: &str, program: Program) -> User {
        let now = Utc::now();
        User::from_parts(
            UserId::new(id),
            format!("User {}", id),
            email.to_string(),
            "hashed_password".to_string(),
            program,
            "1MV23CS001".to_string(),
            "9876543210".to_string(),
            String::new(),
            false,
            now,
            now,
        )
    }

    #[test]
    fn test_program_parse() {
        assert_eq!(Program::parse("web").unwrap(), Program::Web);
        assert_eq!(Program::parse("app").unwrap(), Program::App);
        assert_eq!(Program::parse("dsa").unwrap(), Program::Dsa);
        assert!(Program::parse("ml").is_err());
        assert!(Program::parse("WEB").is_err());
    }

    #[test]
    fn test_program_round_trip() {
        for program in [Program::Web, Program::App, Program::Dsa] {
            assert_eq!(Program::parse(program.as_str()).unwrap(), program);
        }
    }

    #[test]
    fn test_user_mark_verified() {
        let mut user = test_user(1, "a@b.com", Program::Web);
        assert!(!user.is_verified());

        user.mark_verified();
        assert!(user.is_verified());
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = test_user(1, "a@b.com", Program::Web);

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_user_update_touches_timestamp() {
        let mut user = test_user(1, "a@b.com", Program::Web);
        let original_updated = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_about("building things");
        assert_eq!(user.about(), "building things");
        assert!(user.updated_at() > original_updated);
    }
}
