use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub client_id: String,
    pub professional_id: String,
    pub rating: i32,
    pub review_text: Option<String>,
    pub created_at: String,
}
