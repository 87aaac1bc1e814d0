use thiserror::Error;

/// Core domain errors
///
/// Every team-formation failure is a recoverable, structured result that is
/// reported to the caller; none of these are fatal to the process.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not authorized: {message}")]
    NotAuthorized { message: String },

    #[error("Resolve or cancel your pending invite before sending new ones")]
    PendingInviteExists,

    #[error("Receiver already has a pending invite")]
    AlreadyInvited,

    #[error("Receiver is already in a team")]
    AlreadyTeamed,

    #[error("Program mismatch: {message}")]
    ProgramMismatch { message: String },

    #[error("You cannot invite yourself")]
    SelfInvite,

    #[error("No valid receivers")]
    NoValidReceivers,

    #[error("No pending invite found")]
    NoPendingInvite,

    #[error("Team is already full")]
    TeamFull,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::NotAuthorized {
            message: message.into(),
        }
    }

    pub fn program_mismatch(message: impl Into<String>) -> Self {
        Self::ProgramMismatch {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User 'x@y.com' not found");
        assert_eq!(error.to_string(), "Not found: User 'x@y.com' not found");
    }

    #[test]
    fn test_team_full_message() {
        assert_eq!(DomainError::TeamFull.to_string(), "Team is already full");
    }

    #[test]
    fn test_not_authorized_error() {
        let error = DomainError::not_authorized("only a leader may invite");
        assert_eq!(
            error.to_string(),
            "Not authorized: only a leader may invite"
        );
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Email already registered");
        assert_eq!(error.to_string(), "Conflict: Email already registered");
    }
}
