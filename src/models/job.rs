use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A professional's published offering under one category.
///
/// `category_price` caches the sum of the job's pricing rows whenever any
/// exist; the write path recomputes it on every pricing mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub user_id: String,
    pub category_id: String,
    pub category_price: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One priced sub-category row, owned exclusively by its job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategoryPricing {
    pub id: String,
    pub job_id: String,
    pub sub_category_id: String,
    pub sub_category_name: String,
    pub price: f64,
}
