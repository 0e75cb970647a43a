use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A person conducting inspections. At most one inspector is active at a
/// time; activation deactivates all others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Inspector {
    pub id: String,
    pub name: String,
    pub company: String,
    pub role: String,
    pub signature_image_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inspector {
    pub fn new(name: String, company: String, role: String) -> Self {
        let now = Utc::now();
        Inspector {
            id: Uuid::new_v4().to_string(),
            name,
            company,
            role,
            signature_image_path: None,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }
}
