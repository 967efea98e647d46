use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::{require_auth, require_role};
use crate::models::{Role, SubCategoryPricing};
use crate::services::jobs::{self, JobInput};
use crate::state::AppState;

#[derive(Serialize)]
pub struct JobResponse {
    pub job_id: String,
    pub category_id: String,
    pub category_name: String,
    pub category_price: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub sub_categories: Vec<SubCategoryPricing>,
}

// POST /api/jobs
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<JobInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let user = require_auth(&state, &headers)?;
    require_role(&user, Role::Professional)?;

    let job = {
        let mut db = state.db.lock().unwrap();
        jobs::create_job(&mut db, &user.user_id, &body)?
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Job created successfully",
            "job_id": job.job_id,
        })),
    ))
}

// GET /api/jobs — the authenticated professional's own offerings.
pub async fn list_my_jobs(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<JobResponse>>, AppError> {
    let user = require_auth(&state, &headers)?;
    require_role(&user, Role::Professional)?;

    let response = {
        let db = state.db.lock().unwrap();
        let jobs = queries::jobs_for_user(&db, &user.user_id)?;

        let mut response = Vec::with_capacity(jobs.len());
        for (job, category_name) in jobs {
            let sub_categories = queries::pricing_for_job(&db, &job.job_id)?;
            response.push(JobResponse {
                job_id: job.job_id,
                category_id: job.category_id,
                category_name,
                category_price: job.category_price,
                latitude: job.latitude,
                longitude: job.longitude,
                is_active: job.is_active,
                created_at: job.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                updated_at: job.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                sub_categories,
            });
        }
        response
    };

    Ok(Json(response))
}

#[derive(Serialize)]
pub struct JobDetailsResponse {
    pub username: String,
    pub phone_number: String,
    #[serde(flatten)]
    pub job: JobResponse,
}

// GET /api/jobs/:job_id
pub async fn get_job_details(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Json<JobDetailsResponse>, AppError> {
    require_auth(&state, &headers)?;

    let db = state.db.lock().unwrap();

    let job = queries::get_job(&db, &job_id)?.ok_or_else(|| AppError::NotFound("job".to_string()))?;
    let owner = queries::get_user_by_id(&db, &job.user_id)?
        .ok_or_else(|| AppError::NotFound("professional".to_string()))?;
    let category = queries::get_category(&db, &job.category_id)?
        .ok_or_else(|| AppError::NotFound("category".to_string()))?;
    let sub_categories = queries::pricing_for_job(&db, &job.job_id)?;

    Ok(Json(JobDetailsResponse {
        username: owner.username,
        phone_number: owner.phone_number,
        job: JobResponse {
            job_id: job.job_id,
            category_id: job.category_id,
            category_name: category.category_name,
            category_price: job.category_price,
            latitude: job.latitude,
            longitude: job.longitude,
            is_active: job.is_active,
            created_at: job.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: job.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            sub_categories,
        },
    }))
}

// PUT /api/jobs/:job_id
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(body): Json<JobInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_auth(&state, &headers)?;
    require_role(&user, Role::Professional)?;

    {
        let mut db = state.db.lock().unwrap();
        jobs::update_job(&mut db, &job_id, &user.user_id, &body)?;
    }

    Ok(Json(
        serde_json::json!({ "message": "Job updated successfully" }),
    ))
}

// DELETE /api/jobs/:job_id
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_auth(&state, &headers)?;
    require_role(&user, Role::Professional)?;

    {
        let mut db = state.db.lock().unwrap();
        jobs::delete_job(&mut db, &job_id, &user.user_id)?;
    }

    Ok(Json(
        serde_json::json!({ "message": "Job deleted successfully" }),
    ))
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

// POST /api/jobs/:job_id/active
pub async fn set_job_active(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_auth(&state, &headers)?;
    require_role(&user, Role::Professional)?;

    {
        let db = state.db.lock().unwrap();
        jobs::set_job_active(&db, &job_id, &user.user_id, body.active)?;
    }

    Ok(Json(serde_json::json!({ "ok": true, "active": body.active })))
}
