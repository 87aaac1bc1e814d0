//! Token-based authentication

pub mod jwt;

pub use jwt::{
    ActionClaims, ActionPurpose, DeferredInviteClaims, JwtService, SessionClaims, TokenService,
};
