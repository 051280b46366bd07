//! User API Handlers

use axum::{Json, extract::State};
use shared::error::AppResult;
use shared::models::{UserResponse, UserUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::ValidJson;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};

/// GET /users/me
pub async fn me(CurrentUser(current): CurrentUser) -> Json<UserResponse> {
    Json(current.into())
}

/// PUT /users/me
pub async fn update_me(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidJson(payload): ValidJson<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    if let Some(name) = &payload.first_name {
        validate_required_text(name, "first_name", MAX_NAME_LEN)?;
    }
    if let Some(name) = &payload.last_name {
        validate_required_text(name, "last_name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.profile_image_url, "profile_image_url", MAX_URL_LEN)?;

    let mut merged = current;
    payload.apply(&mut merged);
    let saved = user::update_profile(&state.pool, &merged).await?;
    Ok(Json(saved.into()))
}
