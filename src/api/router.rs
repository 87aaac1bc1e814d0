//! HTTP router assembly

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::auth::create_auth_router;
use crate::api::health::{health_check, live_check};
use crate::api::messages::create_messages_router;
use crate::api::profile::create_profile_router;
use crate::api::state::AppState;
use crate::api::teams::create_teams_router;

pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/live", get(live_check))
        .nest("/auth", create_auth_router())
        .nest("/teams", create_teams_router())
        .nest("/profile", create_profile_router())
        .nest("/messages", create_messages_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
