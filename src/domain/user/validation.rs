//! Registration input validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during registration input validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Name must be between {0} and {1} characters long")]
    InvalidName(usize, usize),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least 8 characters long and contain both letters and numbers")]
    InvalidPassword,

    #[error("Invalid mobile number")]
    InvalidMobile,

    #[error("Invalid or unacceptable USN")]
    InvalidUsn,
}

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 32;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid mobile regex"));

/// Validate a display name (2-32 characters)
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    let len = name.chars().count();

    if len < MIN_NAME_LENGTH || len > MAX_NAME_LENGTH {
        return Err(UserValidationError::InvalidName(
            MIN_NAME_LENGTH,
            MAX_NAME_LENGTH,
        ));
    }

    Ok(())
}

/// Validate an email address (loose shape check; deliverability is proven by
/// the verification mail, not the regex)
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Minimum 8 characters
/// - At least one letter and one digit
/// - Letters, digits and common punctuation only
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let allowed = password.chars().all(|c| {
        c.is_ascii_alphanumeric() || r##"!@#$%^&*()_+-=[]{};':"\|,.<>/?"##.contains(c)
    });

    if !(long_enough && has_letter && has_digit && allowed) {
        return Err(UserValidationError::InvalidPassword);
    }

    Ok(())
}

/// Validate a mobile number (10 digits)
pub fn validate_mobile(mobile: &str) -> Result<(), UserValidationError> {
    if !MOBILE_RE.is_match(mobile) {
        return Err(UserValidationError::InvalidMobile);
    }

    Ok(())
}

/// Validate a university serial number (10 characters, 1MV2 prefix)
pub fn validate_usn(usn: &str) -> Result<(), UserValidationError> {
    if usn.len() != 10 || !usn.to_lowercase().starts_with("1mv2") {
        return Err(UserValidationError::InvalidUsn);
    }

    Ok(())
}
