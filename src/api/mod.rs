pub mod auth;
pub mod health;
pub mod messages;
pub mod middleware;
pub mod profile;
pub mod router;
pub mod state;
pub mod teams;
pub mod types;

pub use router::create_router_with_state;
pub use state::AppState;
