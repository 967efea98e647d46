pub mod auth;
pub mod categories;
pub mod chat;
pub mod health;
pub mod jobs;
pub mod messages;
pub mod professional;
pub mod reviews;
pub mod search;

use axum::http::HeaderMap;

use crate::errors::AppError;
use crate::models::Role;
use crate::services::auth::{verify_token, AuthUser};
use crate::state::AppState;

/// Resolve the bearer token into an explicit session value. Runs before any
/// core logic; handlers thread the returned `AuthUser` through by hand.
pub fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    verify_token(&state.config.token_secret, token).ok_or(AppError::Unauthorized)
}

pub fn require_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden(format!(
            "{} role required",
            role.as_str()
        )));
    }
    Ok(())
}
