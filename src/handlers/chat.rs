use axum::Json;
use serde::{Deserialize, Serialize};

use crate::services::intent;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: &'static str,
}

// POST /api/chat
//
// Purely local keyword classification; nothing is persisted and no state
// carries over between calls.
pub async fn classify_intent(Json(body): Json<ChatRequest>) -> Json<ChatResponse> {
    Json(ChatResponse {
        reply: intent::classify(&body.message),
    })
}
