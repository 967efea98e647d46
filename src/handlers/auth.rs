use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::services::auth;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

fn validate_signup(body: &SignupRequest) -> Result<(), AppError> {
    let username_len = body.username.trim().chars().count();
    if !(3..=50).contains(&username_len) {
        return Err(AppError::Validation(
            "username must be 3-50 characters".to_string(),
        ));
    }

    if !body.email.contains('@') || !body.email.contains('.') {
        return Err(AppError::Validation("invalid email address".to_string()));
    }

    let digits = body.phone_number.chars().all(|c| c.is_ascii_digit());
    if !digits || !(10..=15).contains(&body.phone_number.len()) {
        return Err(AppError::Validation(
            "phone_number must be 10-15 digits".to_string(),
        ));
    }

    if body.password.len() < 6 {
        return Err(AppError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }

    Ok(())
}

async fn signup(
    state: Arc<AppState>,
    role: Role,
    body: SignupRequest,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    validate_signup(&body)?;

    let otp = auth::generate_otp();
    let user = User {
        user_id: Uuid::new_v4().to_string(),
        username: body.username.trim().to_string(),
        email: body.email.trim().to_lowercase(),
        phone_number: body.phone_number,
        password_hash: auth::hash_password(&body.password)?,
        role,
        is_verified: false,
        verification_otp: Some(otp.clone()),
    };

    {
        let db = state.db.lock().unwrap();
        if queries::get_user_by_email(&db, &user.email)?.is_some() {
            return Err(AppError::Conflict("email already registered".to_string()));
        }
        queries::create_user(&db, &user)?;
    }

    state
        .email
        .send_code(&user.email, &otp)
        .await
        .map_err(|e| AppError::Email(e.to_string()))?;

    tracing::info!(user_id = %user.user_id, role = role.as_str(), "user registered");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Registered. Verify your email." })),
    ))
}

// POST /api/auth/signup/client
pub async fn signup_client(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    signup(state, Role::Client, body).await
}

// POST /api/auth/signup/professional
pub async fn signup_professional(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    signup(state, Role::Professional, body).await
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub otp: String,
}

// POST /api/auth/verify
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.otp.trim().is_empty() {
        return Err(AppError::Validation("OTP is required".to_string()));
    }

    let user = {
        let db = state.db.lock().unwrap();
        let user = queries::get_unverified_user_by_otp(&db, body.otp.trim())?
            .ok_or_else(|| AppError::Validation("invalid OTP".to_string()))?;
        queries::mark_user_verified(&db, &user.user_id)?;
        user
    };

    let token = auth::sign_token(
        &state.config.token_secret,
        &user.user_id,
        user.role,
        state.config.token_ttl_hours,
    );

    tracing::info!(user_id = %user.user_id, "email verified");

    Ok(Json(serde_json::json!({
        "message": "Email verified successfully",
        "token": token,
    })))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_email(&db, &body.email.trim().to_lowercase())?
    }
    .filter(|u| u.is_verified)
    .ok_or_else(|| AppError::Validation("invalid credentials".to_string()))?;

    if !auth::verify_password(&body.password, &user.password_hash) {
        return Err(AppError::Validation("invalid credentials".to_string()));
    }

    let token = auth::sign_token(
        &state.config.token_secret,
        &user.user_id,
        user.role,
        state.config.token_ttl_hours,
    );

    Ok(Json(serde_json::json!({ "token": token })))
}
