//! Authenticated profile endpoints

use axum::{extract::State, routing::put, Json, Router};
use serde::Deserialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::infrastructure::user::ProfileUpdate;

pub fn create_profile_router() -> Router<AppState> {
    Router::new().route("/", put(update_profile))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    pub name: Option<String>,
    pub about: Option<String>,
    pub usn: Option<String>,
}

async fn update_profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<User>, ApiError> {
    let updated = state
        .accounts
        .update_profile(
            user.id(),
            ProfileUpdate {
                name: body.name,
                about: body.about,
                usn: body.usn,
            },
        )
        .await?;

    Ok(Json(updated))
}
