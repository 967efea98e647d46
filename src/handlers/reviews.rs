use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::{require_auth, require_role};
use crate::models::{Review, Role};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub professional_id: String,
    pub rating: i32,
    pub review_text: Option<String>,
}

// POST /api/reviews
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let user = require_auth(&state, &headers)?;
    require_role(&user, Role::Client)?;

    if !(1..=5).contains(&body.rating) {
        return Err(AppError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let review = Review {
        review_id: Uuid::new_v4().to_string(),
        client_id: user.user_id.clone(),
        professional_id: body.professional_id,
        rating: body.rating,
        review_text: body.review_text,
        created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };

    {
        let db = state.db.lock().unwrap();
        let professional = queries::get_user_by_id(&db, &review.professional_id)?
            .filter(|u| u.role == Role::Professional)
            .ok_or_else(|| AppError::NotFound("professional".to_string()))?;

        queries::insert_review(&db, &review)?;
        tracing::info!(
            professional_id = %professional.user_id,
            rating = review.rating,
            "review created"
        );
    }

    Ok((StatusCode::CREATED, Json(review)))
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub review_id: String,
    pub client_id: String,
    pub client_username: String,
    pub professional_id: String,
    pub rating: i32,
    pub review_text: Option<String>,
    pub created_at: String,
}

// GET /api/reviews/:professional_id
pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<String>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let reviews = {
        let db = state.db.lock().unwrap();
        queries::reviews_for_professional(&db, &professional_id)?
    };

    let response = reviews
        .into_iter()
        .map(|(review, client_username)| ReviewResponse {
            review_id: review.review_id,
            client_id: review.client_id,
            client_username,
            professional_id: review.professional_id,
            rating: review.rating,
            review_text: review.review_text,
            created_at: review.created_at,
        })
        .collect();

    Ok(Json(response))
}
