//! Team formation endpoints

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::team::Team;
use crate::infrastructure::team::{InviteAction, InviteOutcome, TargetOutcome};

pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route("/invite", post(send_invite))
        .route("/respond", post(process_invite))
}

#[derive(Debug, Deserialize)]
pub struct SendInviteBody {
    pub emails: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Invited,
    Deferred,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct ReceiptBody {
    pub email: String,
    pub status: ReceiptStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendInviteResponse {
    pub receipts: Vec<ReceiptBody>,
}

async fn send_invite(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<SendInviteBody>,
) -> Result<Json<SendInviteResponse>, ApiError> {
    let dispatch = state.teams.send_invites(user.id(), body.emails).await?;

    let receipts = dispatch
        .receipts
        .into_iter()
        .map(|receipt| match receipt.outcome {
            TargetOutcome::Invited => ReceiptBody {
                email: receipt.email,
                status: ReceiptStatus::Invited,
                reason: None,
            },
            TargetOutcome::Deferred => ReceiptBody {
                email: receipt.email,
                status: ReceiptStatus::Deferred,
                reason: None,
            },
            TargetOutcome::Skipped(reason) => ReceiptBody {
                email: receipt.email,
                status: ReceiptStatus::Skipped,
                reason: Some(reason.to_string()),
            },
        })
        .collect();

    Ok(Json(SendInviteResponse { receipts }))
}

#[derive(Debug, Deserialize)]
pub struct ProcessInviteBody {
    pub action: InviteAction,
}

#[derive(Debug, Serialize)]
pub struct ProcessInviteResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

async fn process_invite(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<ProcessInviteBody>,
) -> Result<Json<ProcessInviteResponse>, ApiError> {
    let outcome = state.teams.process_invite(user.id(), body.action).await?;

    let response = match outcome {
        InviteOutcome::Accepted { team } => ProcessInviteResponse {
            accepted: true,
            team: Some(team),
        },
        InviteOutcome::Rejected => ProcessInviteResponse {
            accepted: false,
            team: None,
        },
    };

    Ok(Json(response))
}
