//! Authentication and account endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::{Program, User};
use crate::infrastructure::team::TeamOverview;
use crate::infrastructure::user::RegisterRequest;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/session", get(session))
        .route("/verify-account", get(verify_account))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/update-password", post(update_password))
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
    pub program: String,
    pub usn: String,
    pub mobile: String,
    pub about: Option<String>,
    /// Deferred invite token from a registration link, if any
    pub invite_token: Option<String>,
}

/// Outcome of redeeming a deferred invite during registration
#[derive(Debug, Serialize)]
pub struct InviteRedemption {
    pub joined: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite: Option<InviteRedemption>,
}

/// Register a new account. A failing deferred invite never fails the
/// registration itself; the outcome is reported alongside the new user.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
    let program = Program::parse(&body.program)?;

    let user = state
        .accounts
        .register(RegisterRequest {
            name: body.name,
            email: body.email,
            password: body.password,
            program,
            usn: body.usn,
            mobile: body.mobile,
            about: body.about,
        })
        .await?;

    let invite = match body.invite_token {
        Some(token) => Some(match state.teams.redeem_deferred_invite(&token, &user).await {
            Ok(team) => InviteRedemption {
                joined: true,
                message: format!("You have joined team {}", team.id()),
            },
            Err(e) => {
                info!(user = %user.id(), error = %e, "Deferred invite could not be redeemed");
                InviteRedemption {
                    joined: false,
                    message: e.to_string(),
                }
            }
        }),
        None => None,
    };

    Ok((StatusCode::CREATED, Json(RegisterResponse { user, invite })))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: User,
    pub overview: TeamOverview,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (user, token) = state.accounts.login(&body.email, &body.password).await?;
    let overview = state.teams.overview(&user).await?;

    Ok(Json(SessionResponse {
        token: Some(token),
        user,
        overview,
    }))
}

/// Current session: the logged-in user plus their team-formation state
async fn session(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<SessionResponse>, ApiError> {
    let overview = state.teams.overview(&user).await?;

    Ok(Json(SessionResponse {
        token: None,
        user,
        overview,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

/// Landing endpoint for the emailed verification link; sends the browser
/// on to the frontend
async fn verify_account(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Redirect, ApiError> {
    state.accounts.verify_account(&query.token).await?;

    Ok(Redirect::to(&format!(
        "{}/login?verified=true",
        state.domains.frontend
    )))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordBody {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.accounts.forgot_password(&body.email).await?;

    // Same response whether or not the account exists
    Ok(Json(MessageResponse {
        message: "If this email is registered, a reset link has been sent".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
    pub token: String,
    pub password: String,
}

async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .accounts
        .reset_password(&body.token, &body.password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated. You can now log in".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordBody {
    pub current_password: String,
    pub new_password: String,
}

async fn update_password(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<UpdatePasswordBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .accounts
        .update_password(user.id(), &body.current_password, &body.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}
