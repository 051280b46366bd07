//! Auth API Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Role, UserCreate, UserResponse};

use crate::auth::password::{dummy_hash, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, normalize_email, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{ValidForm, ValidJson};

fn email_taken() -> AppError {
    AppError::new(ErrorCode::EmailAlreadyRegistered)
}

/// POST /register
pub async fn register(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<UserCreate>,
) -> AppResult<Json<UserResponse>> {
    let email = normalize_email(&payload.email);
    validate_email(&email)?;
    validate_password(&payload.password)?;
    validate_required_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    if payload.role == Role::Admin {
        security_log!("WARN", "admin_self_registration", email = email.as_str());
        return Err(AppError::with_message(
            ErrorCode::PermissionDenied,
            "Admin accounts cannot be self-registered",
        ));
    }

    if user::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(email_taken());
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::new(ErrorCode::InternalError)
    })?;

    let created = user::create(
        &state.pool,
        user::NewUser {
            email,
            password_hash,
            first_name: payload.first_name.trim().to_string(),
            last_name: payload.last_name.trim().to_string(),
            phone: payload.phone,
            role: payload.role,
        },
    )
    .await
    .map_err(|e| match e {
        // lost a race with a concurrent registration
        RepoError::Duplicate(_) => email_taken(),
        other => other.into(),
    })?;

    tracing::info!(user_id = created.id, role = created.role.as_db(), "User registered");
    Ok(Json(created.into()))
}

/// OAuth2 password-grant style form; `username` carries the email
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// POST /token
///
/// Unknown email, wrong password and disabled account all produce the same
/// response after the same fixed delay, and a password verification runs
/// in every case.
pub async fn token(
    State(state): State<ServerState>,
    ValidForm(form): ValidForm<TokenForm>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&form.username);
    let found = user::find_by_email(&state.pool, &email).await?;

    let verified = match &found {
        Some(u) => verify_password(&form.password, &u.password_hash),
        None => {
            let _ = verify_password(&form.password, dummy_hash());
            false
        }
    };

    let delay = state.config.auth_fixed_delay_ms;
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let user = match found {
        Some(u) if verified && u.is_active => u,
        Some(u) => {
            let reason = if verified { "account_disabled" } else { "wrong_password" };
            security_log!("WARN", "login_failed", user_id = u.id, reason = reason);
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_failed", reason = "unknown_email");
            return Err(AppError::invalid_credentials());
        }
    };

    let access_token = state.jwt_service.generate_token(&user).map_err(|e| {
        tracing::error!(error = %e, "JWT creation failed");
        AppError::new(ErrorCode::InternalError)
    })?;

    security_log!("INFO", "login_success", user_id = user.id);
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.jwt_service.expires_in(),
    }))
}
