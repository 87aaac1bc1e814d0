//! Infrastructure layer - persistence, security, mail and logging

pub mod auth;
pub mod invite;
pub mod logging;
pub mod mail;
pub mod message;
pub mod team;
pub mod user;
