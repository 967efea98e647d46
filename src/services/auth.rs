//! Credential hashing and signed bearer tokens.
//!
//! Tokens are `base64url(user_id:role:expiry) . base64url(hmac-sha1)`.
//! Verification recomputes the signature and checks the expiry, so the
//! server stays stateless: the authenticated caller is an explicit
//! `AuthUser` value handed to each handler, never ambient state.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha1::Sha1;

use crate::errors::AppError;
use crate::models::Role;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

fn signature(secret: &str, payload: &str) -> String {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes())
        .expect("HMAC key of any length is valid");
    mac.update(payload.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

pub fn sign_token(secret: &str, user_id: &str, role: Role, ttl_hours: i64) -> String {
    let expires = (Utc::now() + Duration::hours(ttl_hours)).timestamp();
    let payload = URL_SAFE_NO_PAD.encode(format!("{user_id}:{}:{expires}", role.as_str()));
    let sig = signature(secret, &payload);
    format!("{payload}.{sig}")
}

pub fn verify_token(secret: &str, token: &str) -> Option<AuthUser> {
    let (payload, sig) = token.split_once('.')?;
    if signature(secret, payload) != sig {
        return None;
    }

    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let mut parts = decoded.splitn(3, ':');
    let user_id = parts.next()?;
    let role = parts.next()?;
    let expires: i64 = parts.next()?.parse().ok()?;

    if expires <= Utc::now().timestamp() {
        return None;
    }

    Some(AuthUser {
        user_id: user_id.to_string(),
        role: Role::parse(role),
    })
}

/// Six-digit one-time code for email verification.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}
