//! Bearer token extractor
//!
//! Resolves `Authorization: Bearer <token>` to the current user record.

use std::ops::Deref;

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::{AppError, ErrorCode};
use shared::models::User;

use crate::auth::{JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;

/// Authenticated caller, loaded fresh from the database on every request
///
/// Authorization always uses this record, never the role copied into the
/// token at login.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header.and_then(JwtService::extract_from_header) {
            Some(token) => token,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::not_authenticated());
            }
        };

        let claims = state.jwt_service.validate_token(token).map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", parts.uri)
            );
            match e {
                JwtError::ExpiredToken => AppError::new(ErrorCode::TokenExpired),
                _ => AppError::new(ErrorCode::TokenInvalid),
            }
        })?;

        let user_id = claims
            .user_id()
            .map_err(|_| AppError::new(ErrorCode::TokenInvalid))?;

        // Subject must still exist and be active
        let user = user::find_by_id(&state.pool, user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                security_log!("WARN", "auth_subject_rejected", user_id = user_id);
                AppError::not_authenticated()
            })?;

        let current = CurrentUser(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}
