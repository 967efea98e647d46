use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Category;
use crate::state::AppState;

// GET /api/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = {
        let db = state.db.lock().unwrap();
        queries::list_categories(&db)?
    };

    Ok(Json(categories))
}
