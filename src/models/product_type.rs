use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reference entity describing a steel product category. A fixed default
/// set is seeded when the database is first created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub standard_dimensions: Option<String>,
    /// JSON array of grade names.
    pub standard_grades: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ProductType {
    pub fn new(name: String, description: String) -> Self {
        ProductType {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            standard_dimensions: None,
            standard_grades: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
