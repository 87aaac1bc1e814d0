//! User domain module

pub mod entity;
pub mod repository;
pub mod validation;

pub use entity::{NewUser, Program, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_mobile, validate_name, validate_password, validate_usn,
    UserValidationError,
};
