use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries::{self, OfferingFilter};
use crate::errors::AppError;

pub const DEFAULT_RADIUS_KM: f64 = 50.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Default)]
pub struct SearchParams {
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    pub text: Option<String>,
    pub point: Option<(f64, f64)>,
    pub max_distance_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub job_id: String,
    pub user_id: String,
    pub username: String,
    pub category_id: String,
    pub category_name: String,
    pub category_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Great-circle distance between two lat/lon points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Resolve active offerings for the given filters, price ascending.
///
/// When a point is supplied, offerings without a stored point are excluded
/// and the rest are kept only within the radius (default 50 km). The SQL
/// layer already orders by price with job id as the tie break, and the
/// distance pass below preserves that order.
pub fn search_offerings(
    conn: &Connection,
    params: &SearchParams,
) -> Result<Vec<SearchResult>, AppError> {
    let filter = OfferingFilter {
        category_id: params.category_id.clone(),
        sub_category_id: params.sub_category_id.clone(),
        text: params.text.clone(),
    };

    let rows = queries::search_offerings(conn, &filter)?;

    let results = match params.point {
        Some((lat, lon)) => {
            let radius = params.max_distance_km.unwrap_or(DEFAULT_RADIUS_KM);
            if radius <= 0.0 {
                return Err(AppError::Validation(
                    "max_distance must be positive".to_string(),
                ));
            }

            rows.into_iter()
                .filter_map(|row| {
                    let (job_lat, job_lon) = match (row.latitude, row.longitude) {
                        (Some(a), Some(b)) => (a, b),
                        _ => return None,
                    };
                    let distance = haversine_km(lat, lon, job_lat, job_lon);
                    if distance > radius {
                        return None;
                    }
                    Some(SearchResult {
                        job_id: row.job_id,
                        user_id: row.user_id,
                        username: row.username,
                        category_id: row.category_id,
                        category_name: row.category_name,
                        category_price: row.category_price,
                        distance_km: Some(distance),
                    })
                })
                .collect()
        }
        None => rows
            .into_iter()
            .map(|row| SearchResult {
                job_id: row.job_id,
                user_id: row.user_id,
                username: row.username,
                category_id: row.category_id,
                category_name: row.category_name,
                category_price: row.category_price,
                distance_km: None,
            })
            .collect(),
    };

    Ok(results)
}
