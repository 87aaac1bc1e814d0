//! Team domain module

pub mod entity;
pub mod repository;

pub use entity::{MemberSlot, Team, TeamId, TeamRole};
pub use repository::TeamRepository;
