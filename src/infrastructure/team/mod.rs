//! Team persistence and the formation engine

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresTeamRepository;
pub use repository::InMemoryTeamRepository;
pub use service::{
    InviteAction, InviteDispatch, InviteOutcome, InviteReceipt, MembershipKind, PersonSummary,
    TargetOutcome, TeamFormationApi, TeamFormationService, TeamOverview, TeamSummary,
};
