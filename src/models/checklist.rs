use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChecklistCategory {
    Loading,
    Unloading,
    QualityControl,
    SafetyCompliance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChecklistInputType {
    Text,
    Number,
    Boolean,
    Radio,
    MultiSelect,
    Date,
}

/// A structured question answered during an inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChecklistItem {
    pub id: String,
    pub category: ChecklistCategory,
    pub question: String,
    pub input_type: ChecklistInputType,
    /// JSON array of choices for radio / multi-select items.
    pub options: Option<String>,
    pub is_required: bool,
    pub sequence_order: i64,
    pub is_active: bool,
}

impl ChecklistItem {
    pub fn new(category: ChecklistCategory, question: String, input_type: ChecklistInputType) -> Self {
        ChecklistItem {
            id: Uuid::new_v4().to_string(),
            category,
            question,
            input_type,
            options: None,
            is_required: false,
            sequence_order: 0,
            is_active: true,
        }
    }

    /// Parsed option list for radio / multi-select items.
    pub fn option_values(&self) -> Vec<String> {
        self.options
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default()
    }
}

/// An answer linking an inspection to a checklist item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChecklistResponse {
    pub id: String,
    pub inspection_id: String,
    pub checklist_item_id: String,
    pub response_value: String,
    pub response_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChecklistResponse {
    pub fn new(inspection_id: String, checklist_item_id: String, response_value: String) -> Self {
        ChecklistResponse {
            id: Uuid::new_v4().to_string(),
            inspection_id,
            checklist_item_id,
            response_value,
            response_notes: None,
            created_at: Utc::now(),
        }
    }
}
