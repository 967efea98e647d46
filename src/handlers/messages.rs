use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::require_auth;
use crate::models::Message;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub receiver_id: String,
    pub message_text: String,
}

// POST /api/messages
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let user = require_auth(&state, &headers)?;

    if body.message_text.trim().is_empty() {
        return Err(AppError::Validation(
            "message_text must not be empty".to_string(),
        ));
    }
    if body.receiver_id == user.user_id {
        return Err(AppError::Validation(
            "cannot send a message to yourself".to_string(),
        ));
    }

    let message = Message {
        message_id: Uuid::new_v4().to_string(),
        sender_id: user.user_id.clone(),
        receiver_id: body.receiver_id,
        message_text: body.message_text,
        is_read: false,
        created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };

    {
        let db = state.db.lock().unwrap();
        if queries::get_user_by_id(&db, &message.receiver_id)?.is_none() {
            return Err(AppError::NotFound("receiver".to_string()));
        }
        queries::insert_message(&db, &message)?;
    }

    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Deserialize)]
pub struct ConversationQuery {
    pub peer_id: String,
}

// GET /api/messages?peer_id=...
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    let user = require_auth(&state, &headers)?;

    let messages = {
        let db = state.db.lock().unwrap();
        queries::messages_between(&db, &user.user_id, &query.peer_id)?
    };

    Ok(Json(messages))
}
