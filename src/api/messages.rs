//! Contact-form endpoint

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::message::NewMessage;

pub fn create_messages_router() -> Router<AppState> {
    Router::new().route("/", post(submit_message))
}

#[derive(Debug, Deserialize)]
pub struct SubmitMessageBody {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitMessageResponse {
    pub id: i64,
}

async fn submit_message(
    State(state): State<AppState>,
    Json(body): Json<SubmitMessageBody>,
) -> Result<(StatusCode, Json<SubmitMessageResponse>), ApiError> {
    let stored = state
        .messages
        .submit(NewMessage {
            name: body.name,
            email: body.email,
            subject: body.subject,
            message: body.message,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SubmitMessageResponse { id: stored.id })))
}
