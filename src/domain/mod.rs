//! Domain layer - core entities, repository traits and business errors

pub mod error;
pub mod invite;
pub mod message;
pub mod notification;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use invite::{PendingRequest, RequestId, RequestRepository};
pub use message::{Message, MessageRepository, NewMessage};
pub use notification::{Notifier, OutboundEmail};
pub use team::{MemberSlot, Team, TeamId, TeamRepository, TeamRole};
pub use user::{NewUser, Program, User, UserId, UserRepository};
