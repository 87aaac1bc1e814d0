//! Mentorship program registration backend
//!
//! Accounts, team formation with a single-outstanding-invite protocol,
//! deferred invites for unregistered emails, and a contact form.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use api::state::AppState;
use infrastructure::auth::JwtService;
use infrastructure::invite::PostgresRequestRepository;
use infrastructure::mail::BrevoNotifier;
use infrastructure::message::{MessageService, PostgresMessageRepository};
use infrastructure::team::{PostgresTeamRepository, TeamFormationService};
use infrastructure::user::{AccountService, Argon2Hasher, PostgresUserRepository};

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let teams = Arc::new(PostgresTeamRepository::new(pool.clone()));
    let requests = Arc::new(PostgresRequestRepository::new(pool.clone()));
    let messages = Arc::new(PostgresMessageRepository::new(pool));

    let hasher = Arc::new(Argon2Hasher::new());
    let tokens = Arc::new(JwtService::new(&config.auth));
    let notifier = Arc::new(BrevoNotifier::new(config.mail.clone()));

    let accounts = AccountService::new(
        users.clone(),
        hasher,
        tokens.clone(),
        notifier.clone(),
        config.domains.clone(),
    );

    let team_formation = TeamFormationService::new(
        users,
        teams,
        requests,
        notifier,
        tokens.clone(),
        config.domains.clone(),
    );

    let message_service = MessageService::new(messages);

    Ok(AppState {
        accounts: Arc::new(accounts),
        teams: Arc::new(team_formation),
        messages: Arc::new(message_service),
        tokens,
        domains: config.domains.clone(),
    })
}
