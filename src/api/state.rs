//! Application state for shared services

use std::sync::Arc;

use crate::config::DomainConfig;
use crate::infrastructure::auth::TokenService;
use crate::infrastructure::message::MessageApi;
use crate::infrastructure::team::TeamFormationApi;
use crate::infrastructure::user::AccountApi;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountApi>,
    pub teams: Arc<dyn TeamFormationApi>,
    pub messages: Arc<dyn MessageApi>,
    pub tokens: Arc<dyn TokenService>,
    pub domains: DomainConfig,
}
