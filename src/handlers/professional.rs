use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::{require_auth, require_role};
use crate::models::{ProfessionalDocuments, Role, VerificationStatus};
use crate::state::AppState;

const NATIONAL_ID_FIELD: &str = "national_id_document";
const WORK_CLEARANCE_FIELD: &str = "work_clearance_document";

/// Keep only characters that are safe in a stored object name.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

struct UploadedFile {
    file_name: String,
    bytes: Vec<u8>,
}

// POST /api/professional/documents
//
// Replaces any previously submitted pair and resets the verification status
// to pending.
pub async fn upload_documents(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let user = require_auth(&state, &headers)?;
    require_role(&user, Role::Professional)?;

    let mut national_id: Option<UploadedFile> = None;
    let mut work_clearance: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name != NATIONAL_ID_FIELD && name != WORK_CLEARANCE_FIELD {
            continue;
        }

        let file_name = sanitize_file_name(field.file_name().unwrap_or("document"));
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?
            .to_vec();

        if bytes.is_empty() {
            return Err(AppError::Validation(format!("{name} is empty")));
        }

        let file = UploadedFile { file_name, bytes };
        if name == NATIONAL_ID_FIELD {
            national_id = Some(file);
        } else {
            work_clearance = Some(file);
        }
    }

    let national_id = national_id.ok_or_else(|| {
        AppError::Validation(format!("{NATIONAL_ID_FIELD} is required"))
    })?;
    let work_clearance = work_clearance.ok_or_else(|| {
        AppError::Validation(format!("{WORK_CLEARANCE_FIELD} is required"))
    })?;

    let national_id_url = state
        .documents
        .upload(
            &format!("{}/national_id_{}", user.user_id, national_id.file_name),
            national_id.bytes,
        )
        .await
        .map_err(|e| AppError::Internal(format!("document upload failed: {e}")))?;

    let work_clearance_url = state
        .documents
        .upload(
            &format!(
                "{}/work_clearance_{}",
                user.user_id, work_clearance.file_name
            ),
            work_clearance.bytes,
        )
        .await
        .map_err(|e| AppError::Internal(format!("document upload failed: {e}")))?;

    let doc = ProfessionalDocuments {
        document_id: Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        national_id_document_url: Some(national_id_url),
        work_clearance_document_url: Some(work_clearance_url),
        verification_status: VerificationStatus::Pending,
    };

    {
        let db = state.db.lock().unwrap();
        queries::upsert_documents(&db, &doc)?;
    }

    tracing::info!(user_id = %user.user_id, "verification documents submitted");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Documents uploaded successfully",
            "status": doc.verification_status.as_str(),
        })),
    ))
}

// GET /api/professional/documents/status
pub async fn document_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_auth(&state, &headers)?;
    require_role(&user, Role::Professional)?;

    let doc = {
        let db = state.db.lock().unwrap();
        queries::get_documents(&db, &user.user_id)?
    }
    .ok_or_else(|| AppError::NotFound("No documents found".to_string()))?;

    Ok(Json(
        serde_json::json!({ "status": doc.verification_status.as_str() }),
    ))
}
