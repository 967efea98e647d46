use serde::{Deserialize, Serialize};

/// Static reference data, seeded by migration and otherwise immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub category_id: String,
    pub category_name: String,
}

/// Created on demand when a professional prices a sub-category name that
/// does not exist yet under the owning category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategory {
    pub sub_category_id: String,
    pub category_id: String,
    pub sub_category_name: String,
}
