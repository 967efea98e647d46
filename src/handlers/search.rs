use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::search::{self, SearchParams, SearchResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    /// Free-text filter against category display names.
    pub q: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_distance: Option<f64>,
}

// GET /api/search
pub async fn search_offerings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    let point = match (query.latitude, query.longitude) {
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(AppError::Validation(
                    "latitude/longitude out of range".to_string(),
                ));
            }
            Some((lat, lon))
        }
        (None, None) => None,
        _ => {
            return Err(AppError::Validation(
                "latitude and longitude must be provided together".to_string(),
            ))
        }
    };

    let params = SearchParams {
        category_id: query.category_id,
        sub_category_id: query.sub_category_id,
        text: query.q,
        point,
        max_distance_km: query.max_distance,
    };

    let results = {
        let db = state.db.lock().unwrap();
        search::search_offerings(&db, &params)
    }
    .map_err(|e| match e {
        AppError::Validation(_) => e,
        other => {
            tracing::error!(error = %other, "offering search failed");
            AppError::Internal("search failed".to_string())
        }
    })?;

    Ok(Json(results))
}
